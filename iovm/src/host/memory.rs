use std::collections::HashMap;

use iovm_asm::{FaultReason, OpcodeRepr};

use super::Host;
use crate::callback::CallbackState;
use crate::consts::VM_ADDRESS_MASK;

#[derive(Debug, Clone)]
struct Chip {
    bytes: Vec<u8>,
    readable: bool,
    writable: bool,
}

/// In-memory reference host.
///
/// Memory targets are plain byte vectors with per-chip read/write policies;
/// transactions complete in a single invocation. Client notifications are
/// recorded instead of transmitted, so tests and embedders can inspect what
/// a procedure produced.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    chips: HashMap<u8, Chip>,
    reads: Vec<(u16, Vec<u8>)>,
    ends: usize,
    aborts: usize,
    wait_budget: u32,
    timer: u32,
}

impl MemoryHost {
    /// Create a host with no memory targets defined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or replace) a memory target.
    pub fn install_chip(&mut self, target: u8, bytes: Vec<u8>, readable: bool, writable: bool) {
        self.chips.insert(
            target,
            Chip {
                bytes,
                readable,
                writable,
            },
        );
    }

    /// Contents of a memory target, if defined.
    pub fn chip(&self, target: u8) -> Option<&[u8]> {
        self.chips.get(&target).map(|chip| chip.bytes.as_slice())
    }

    /// Read-complete messages recorded so far, as `(raw_len, data)` pairs.
    pub fn reads(&self) -> &[(u16, Vec<u8>)] {
        &self.reads
    }

    /// Number of end-of-procedure messages recorded.
    pub const fn ends(&self) -> usize {
        self.ends
    }

    /// Number of abort messages recorded.
    pub const fn aborts(&self) -> usize {
        self.aborts
    }

    /// Number of polls a wait may make before the countdown timer elapses.
    ///
    /// Only consulted when the waiting channel's `tim` register is zero; a
    /// non-zero `tim` bounds the wait by itself.
    pub fn set_wait_budget(&mut self, polls: u32) {
        self.wait_budget = polls;
    }

    fn read(&mut self, state: &mut CallbackState<'_>) -> Result<(), FaultReason> {
        let chip = self.chips.get(&state.target).ok_or(FaultReason::MemoryChipUndefined)?;
        if !chip.readable {
            return Err(FaultReason::MemoryChipNotReadable);
        }

        let start = state.address as usize;
        let len = state.len as usize;
        let data = chip
            .bytes
            .get(start..start + len)
            .ok_or(FaultReason::MemoryChipAddressOutOfRange)?
            .to_vec();

        let raw_len = (state.len & 0xffff) as u16;
        state.address = (state.address + state.len) & VM_ADDRESS_MASK;
        state.complete = true;
        self.send_read(raw_len, &data);

        Ok(())
    }

    fn write(&mut self, state: &mut CallbackState<'_>) -> Result<(), FaultReason> {
        let len = state.len as usize;
        let payload = state.payload().get(..len).ok_or(FaultReason::OutOfRange)?.to_vec();

        let chip = self
            .chips
            .get_mut(&state.target)
            .ok_or(FaultReason::MemoryChipUndefined)?;
        if !chip.writable {
            return Err(FaultReason::MemoryChipNotWritable);
        }

        let start = state.address as usize;
        chip.bytes
            .get_mut(start..start + len)
            .ok_or(FaultReason::MemoryChipAddressOutOfRange)?
            .copy_from_slice(&payload);

        state.p += len;
        state.address = (state.address + state.len) & VM_ADDRESS_MASK;
        state.complete = true;

        Ok(())
    }

    fn wait(&mut self, state: &mut CallbackState<'_>) -> Result<(), FaultReason> {
        let chip = self.chips.get(&state.target).ok_or(FaultReason::MemoryChipUndefined)?;
        if !chip.readable {
            return Err(FaultReason::MemoryChipNotReadable);
        }

        let byte = *chip
            .bytes
            .get(state.address as usize)
            .ok_or(FaultReason::MemoryChipAddressOutOfRange)?;

        let released = match state.comparison() {
            Some(cmp) => !cmp.evaluate(byte & state.msk, state.cmp),
            None => true,
        };
        if released {
            state.complete = true;
            return Ok(());
        }

        if state.timeout > 0 {
            state.timeout -= 1;
            if state.timeout == 0 {
                return Err(FaultReason::TimedOut);
            }
        } else if self.timer_elapsed() {
            return Err(FaultReason::TimedOut);
        }

        Ok(())
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            chips: HashMap::new(),
            reads: Vec::new(),
            ends: 0,
            aborts: 0,
            wait_budget: 1024,
            timer: 0,
        }
    }
}

impl Host for MemoryHost {
    fn on_opcode(&mut self, state: &mut CallbackState<'_>) -> Result<(), FaultReason> {
        match state.op {
            OpcodeRepr::READ => self.read(state),
            OpcodeRepr::WRITE => self.write(state),
            op if op.is_wait() => self.wait(state),
            _ => Ok(()),
        }
    }

    fn send_read(&mut self, raw_len: u16, data: &[u8]) {
        self.reads.push((raw_len, data.to_vec()));
    }

    fn send_end(&mut self) {
        self.ends += 1;
    }

    fn send_abort(&mut self) {
        self.aborts += 1;
    }

    fn timer_reset(&mut self) {
        self.timer = self.wait_budget;
    }

    fn timer_elapsed(&mut self) -> bool {
        if self.timer == 0 {
            return true;
        }

        self.timer -= 1;
        false
    }
}
