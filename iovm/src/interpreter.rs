//! [`Interpreter`] implementation

use iovm_asm::{Channel, FaultReason};

use crate::callback::CallbackState;
use crate::consts::VM_CHANNEL_COUNT;
use crate::registers::ChannelRegisters;
use crate::state::ExecState;

mod constructors;
mod control;
mod exec;

/// VM interpreter.
///
/// An instance is generic over the host adapter that drives its I/O opcodes
/// and holds a non-owning view of the procedure bound by
/// [`Interpreter::load`]; the procedure must outlive the interpreter. All
/// mutable state lives inline, so constructing and running a VM performs no
/// allocation.
#[derive(Debug, Clone)]
pub struct Interpreter<'prog, H> {
    state: ExecState,
    fault: Option<FaultReason>,
    registers: [ChannelRegisters; VM_CHANNEL_COUNT],
    callback: CallbackState<'prog>,
    program: &'prog [u8],
    offset: usize,
    host: H,
}

impl<'prog, H> Interpreter<'prog, H> {
    /// The channel register file.
    pub const fn registers(&self) -> &[ChannelRegisters; VM_CHANNEL_COUNT] {
        &self.registers
    }

    /// Registers of one channel; indices above 3 fold onto the encodable
    /// channels.
    pub const fn channel(&self, channel: Channel) -> &ChannelRegisters {
        &self.registers[(channel & 0x03) as usize]
    }

    /// The transaction record shared with the host.
    pub const fn callback_state(&self) -> &CallbackState<'prog> {
        &self.callback
    }

    /// The bound procedure.
    pub const fn program(&self) -> &'prog [u8] {
        self.program
    }

    /// Current program offset.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Host adapter.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host adapter.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the interpreter, releasing its host adapter.
    pub fn into_host(self) -> H {
        self.host
    }
}

impl<'prog, H> AsRef<H> for Interpreter<'prog, H> {
    fn as_ref(&self) -> &H {
        &self.host
    }
}

impl<'prog, H> AsMut<H> for Interpreter<'prog, H> {
    fn as_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
