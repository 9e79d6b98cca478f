//! Static pre-execution validation of procedures.
//!
//! The instruction set has no branching, so a single forward walk decodes
//! exactly the instructions execution would: a transport can validate a
//! procedure and size its read-response frame before handing the bytes to an
//! interpreter. Passing the preflight says nothing about whether the host
//! will accept the addressed targets.

use iovm_asm::{Instruction, OpcodeRepr};

use crate::consts::{VM_CHANNEL_COUNT, VM_MAX_TRANSFER_LEN};
use crate::error::VmError;

/// What a validated procedure will do, computed without executing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramSummary {
    /// Number of instructions the procedure executes, the terminator
    /// included.
    pub instructions: usize,
    /// Total bytes every read transaction will deliver back to the client.
    pub read_response_size: usize,
    /// Total procedure bytes consumed as write payloads.
    pub write_payload_size: usize,
}

/// Decode a whole procedure, checking that every instruction is well formed.
///
/// Fails with the same error an interpreter would fault with: an unknown
/// opcode or operands overrunning the buffer. The walk starts from a freshly
/// initialised register file, like the first run of a loaded procedure.
pub fn preflight(program: &[u8]) -> Result<ProgramSummary, VmError> {
    let mut lens = [0usize; VM_CHANNEL_COUNT];
    let mut summary = ProgramSummary::default();
    let mut offset = 0;

    while let Some(&byte) = program.get(offset) {
        let at = offset;
        offset += 1;

        let instruction = Instruction::parse(byte);
        let channel = instruction.channel() as usize;
        summary.instructions += 1;

        let operands = match instruction.op() {
            OpcodeRepr::END => return Ok(summary),
            OpcodeRepr::SETA8 | OpcodeRepr::SETTV => 1,
            OpcodeRepr::SETA16 | OpcodeRepr::SETCMPMSK => 2,
            OpcodeRepr::SETA24 => 3,
            OpcodeRepr::SETTIM => 4,
            OpcodeRepr::SETLEN => {
                let imm = program
                    .get(offset..offset + 2)
                    .and_then(|bytes| <[u8; 2]>::try_from(bytes).ok())
                    .ok_or(VmError::OutOfRange { offset: at })?;
                lens[channel] = match u16::from_le_bytes(imm) {
                    0 => VM_MAX_TRANSFER_LEN as usize,
                    n => n as usize,
                };
                2
            }
            OpcodeRepr::READ => {
                summary.read_response_size += lens[channel];
                0
            }
            OpcodeRepr::WRITE => {
                // The payload is part of the instruction stream.
                let payload = lens[channel];
                if program.len() - offset < payload {
                    return Err(VmError::OutOfRange { offset: at });
                }
                summary.write_payload_size += payload;
                payload
            }
            OpcodeRepr::WWNEQ
            | OpcodeRepr::WWEQ
            | OpcodeRepr::WWLT
            | OpcodeRepr::WWGT
            | OpcodeRepr::WWLTE => 0,
            OpcodeRepr::RESERV0F => {
                return Err(VmError::UnknownOpcode { opcode: byte, offset: at });
            }
        };

        if program.len() - offset < operands {
            return Err(VmError::OutOfRange { offset: at });
        }
        offset += operands;
    }

    // Running off the end of the buffer terminates like an END would.
    Ok(summary)
}
