//! The cooperative step driver.

use iovm_asm::{Channel, FaultReason, Instruction, OpcodeRepr, Tv};

use tracing::debug;

use super::Interpreter;
use crate::callback::CallbackState;
use crate::error::VmError;
use crate::host::Host;
use crate::state::ExecState;

impl<'prog, H> Interpreter<'prog, H>
where
    H: Host,
{
    /// Execute as much of the procedure as possible without blocking.
    ///
    /// Register-setting instructions run back to back within one call. An
    /// I/O instruction hands its transaction record to the host at most once
    /// per call: once when it is dispatched, then once per subsequent call
    /// until the host reports completion, after which execution falls
    /// through to the following instructions in the same call. Control
    /// returns whenever a transaction is left incomplete, right after one
    /// was dispatched, or when the procedure terminates.
    ///
    /// Terminating, cleanly or by fault, notifies the client through the
    /// host exactly once.
    pub fn exec(&mut self) -> Result<ExecState, VmError> {
        let mut invoked = false;

        match self.state {
            ExecState::ResumeCallback => {
                invoked = true;
                if !self.invoke_host()? {
                    return Ok(self.state);
                }
                self.commit();
                self.state = ExecState::ExecuteNext;
            }
            state if state < ExecState::Loaded => {
                return Err(VmError::InvalidOperationForState(state));
            }
            _ => (),
        }

        if self.state == ExecState::Loaded {
            self.state = ExecState::Reset;
        }
        if self.state == ExecState::Reset {
            self.offset = 0;
            self.fault = None;
            self.callback = CallbackState::cleared(self.program);
            self.state = ExecState::ExecuteNext;
        }

        while self.state == ExecState::ExecuteNext {
            let byte = match self.program.get(self.offset) {
                Some(byte) => *byte,
                None => return self.end(),
            };

            let at = self.offset;
            self.offset += 1;

            let instruction = Instruction::parse(byte);
            let channel = instruction.channel() as usize;

            match instruction.op() {
                OpcodeRepr::END => return self.end(),
                OpcodeRepr::SETA8 => {
                    let [lo] = self.fetch(at)?;
                    self.registers[channel].set_address(lo as u32);
                }
                OpcodeRepr::SETA16 => {
                    let imm = self.fetch(at)?;
                    self.registers[channel].set_address(u16::from_le_bytes(imm) as u32);
                }
                OpcodeRepr::SETA24 => {
                    let [lo, hi, bk] = self.fetch(at)?;
                    self.registers[channel].set_address(u32::from_le_bytes([lo, hi, bk, 0]));
                }
                OpcodeRepr::SETTV => {
                    let [tv] = self.fetch(at)?;
                    self.registers[channel].set_tv(Tv::new(tv));
                }
                OpcodeRepr::SETLEN => {
                    let imm = self.fetch(at)?;
                    self.registers[channel].set_transfer_len(u16::from_le_bytes(imm));
                }
                OpcodeRepr::SETCMPMSK => {
                    let [cmp, msk] = self.fetch(at)?;
                    self.registers[channel].set_cmp_msk(cmp, msk);
                }
                OpcodeRepr::SETTIM => {
                    let imm = self.fetch(at)?;
                    self.registers[channel].set_timeout(u32::from_le_bytes(imm));
                }
                OpcodeRepr::RESERV0F => {
                    return Err(self.fail(VmError::UnknownOpcode { opcode: byte, offset: at }));
                }
                op => {
                    self.stage(op, instruction.channel());
                    if invoked {
                        // The host already ran once this call; the next call
                        // performs this transaction's initial invocation.
                        return Ok(self.state);
                    }
                    if self.invoke_host()? {
                        self.commit();
                        self.state = ExecState::ExecuteNext;
                    }
                    return Ok(self.state);
                }
            }
        }

        Ok(self.state)
    }

    /// Fetch the immediate operands of the instruction that started at `at`.
    fn fetch<const N: usize>(&mut self, at: usize) -> Result<[u8; N], VmError> {
        let end = self.offset + N;
        let imm = self
            .program
            .get(self.offset..end)
            .and_then(|bytes| <[u8; N]>::try_from(bytes).ok());

        match imm {
            Some(imm) => {
                self.offset = end;
                Ok(imm)
            }
            None => Err(self.fail(VmError::OutOfRange { offset: at })),
        }
    }

    /// Populate the transaction record for an I/O opcode and suspend.
    fn stage(&mut self, op: OpcodeRepr, channel: Channel) {
        let regs = &self.registers[(channel & 0x03) as usize];

        self.callback = CallbackState {
            initial: true,
            complete: false,
            program: self.program,
            p: self.offset,
            op,
            channel,
            target: regs.tv().target(),
            auto_advance: regs.tv().auto_advance(),
            address: regs.address(),
            // A wait polls a single byte; the length register is untouched.
            len: if op.is_wait() { 1 } else { regs.transfer_len() },
            timeout: regs.timeout(),
            cmp: regs.cmp(),
            msk: regs.msk(),
        };
        self.state = ExecState::ResumeCallback;

        if op.is_wait() {
            self.host.timer_reset();
        }
    }

    /// Invoke the host once, reporting whether the transaction completed.
    fn invoke_host(&mut self) -> Result<bool, VmError> {
        let result = self.host.on_opcode(&mut self.callback);
        self.callback.initial = false;

        match result {
            Ok(()) => Ok(self.callback.complete),
            Err(reason) => Err(self.fail(VmError::Fault(reason))),
        }
    }

    /// Commit a completed transaction back to the register file.
    fn commit(&mut self) {
        let channel = (self.callback.channel & 0x03) as usize;

        match self.callback.op {
            OpcodeRepr::READ => {
                if self.callback.auto_advance {
                    self.registers[channel].set_address(self.callback.address);
                }
            }
            OpcodeRepr::WRITE => {
                if self.callback.auto_advance {
                    self.registers[channel].set_address(self.callback.address);
                }
                // The host consumed the payload; resume decoding past it.
                self.offset = self.callback.p;
            }
            op if op.is_wait() => self.host.timer_cleanup(),
            _ => (),
        }
    }

    fn end(&mut self) -> Result<ExecState, VmError> {
        self.state = ExecState::Ended;
        self.host.send_end();

        Ok(ExecState::Ended)
    }

    fn fail(&mut self, error: VmError) -> VmError {
        let reason = error.reason();
        let waiting = self.state == ExecState::ResumeCallback && self.callback.op.is_wait();

        debug!("execution fault {reason:?} at offset {}", self.offset);

        self.fault = Some(reason);
        self.state = ExecState::Errored;

        if waiting {
            self.host.timer_cleanup();
        }
        if matches!(reason, FaultReason::TimedOut | FaultReason::Aborted) {
            self.host.send_abort();
        }
        self.host.send_end();

        error
    }
}
