//! Host adapter contract.

use iovm_asm::FaultReason;

use crate::callback::CallbackState;

mod memory;

pub use memory::MemoryHost;

/// Capabilities a host provides to the VM: the memory controller that drives
/// I/O opcodes, the transport that reports results back to the client, and
/// the countdown timer bounding the wait opcodes.
///
/// One adapter is bound at construction and owns any embedder scratch state;
/// it is reachable again through
/// [`Interpreter::host_mut`](crate::interpreter::Interpreter::host_mut).
pub trait Host {
    /// Drive one step of the I/O transaction described by `state`.
    ///
    /// Invoked once when the VM dispatches an I/O opcode (`state.initial` is
    /// true) and once per subsequent `exec` until the host sets
    /// `state.complete`. Returning an error transitions the VM to the
    /// errored state; `TimedOut` and `Aborted` additionally notify the
    /// client through [`Host::send_abort`].
    fn on_opcode(&mut self, state: &mut CallbackState<'_>) -> Result<(), FaultReason>;

    /// Deliver the bytes gathered by a completed read to the client.
    ///
    /// `raw_len` is the transfer length as encoded, where zero means the
    /// maximum transfer. Hosts call this from within [`Host::on_opcode`];
    /// the VM itself never stages read data.
    fn send_read(&mut self, raw_len: u16, data: &[u8]);

    /// Notify the client the procedure has terminated, cleanly or not.
    fn send_end(&mut self);

    /// Notify the client the procedure was aborted by a timeout or an abort
    /// condition.
    fn send_abort(&mut self);

    /// Arm the countdown timer before a wait transaction starts polling.
    fn timer_reset(&mut self);

    /// Poll the countdown timer from within a wait transaction.
    fn timer_elapsed(&mut self) -> bool;

    /// Release timer resources after a wait transaction leaves the VM.
    fn timer_cleanup(&mut self) {}
}
