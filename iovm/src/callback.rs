//! The transaction record shared between the VM and its host.

use iovm_asm::{Address, Channel, Comparison, OpcodeRepr};

/// Bidirectional record describing the I/O transaction in flight.
///
/// The VM populates the record when it dispatches an I/O opcode and commits
/// parts of it back to the channel registers when the host reports
/// completion. Field ownership during a transaction:
///
/// - read-only for the host: `initial`, `program`, `op`, `channel`,
///   `target`, `auto_advance`, `cmp`, `msk`;
/// - read-write for the host: `address`, `len`, `timeout`, `p`, `complete`.
///
/// A host may make partial progress on each invocation: advance `address`,
/// decrement `len` or `timeout`, and leave `complete` unset; the VM will
/// re-invoke it on the next `exec`.
#[derive(Debug, Clone, Copy)]
pub struct CallbackState<'prog> {
    /// True only on the first invocation of the current transaction. The VM
    /// clears it after every invocation.
    pub initial: bool,
    /// Set by the host when the transaction is finished.
    pub complete: bool,
    /// The whole procedure, for sourcing `WRITE` payloads.
    pub program: &'prog [u8],
    /// Program offset of the byte after the instruction. A `WRITE` host
    /// consumes payload from here and must advance it past the bytes it
    /// wrote; the VM commits it back as the next instruction offset.
    pub p: usize,
    /// The opcode that suspended execution.
    pub op: OpcodeRepr,
    /// Channel the instruction ran on.
    pub channel: Channel,
    /// Memory-target identifier from the channel's `tv` register.
    pub target: u8,
    /// Auto-advance flag from the channel's `tv` register.
    pub auto_advance: bool,
    /// Working 24-bit address; hosts advance it as bytes transfer.
    pub address: Address,
    /// Working transfer length in bytes.
    pub len: u32,
    /// Working wait timeout in host ticks.
    pub timeout: u32,
    /// Comparison value for the wait opcodes.
    pub cmp: u8,
    /// Comparison mask for the wait opcodes.
    pub msk: u8,
}

impl<'prog> CallbackState<'prog> {
    /// An idle record bound to `program`, as established by a reset.
    pub(crate) const fn cleared(program: &'prog [u8]) -> Self {
        Self {
            initial: false,
            complete: false,
            program,
            p: 0,
            op: OpcodeRepr::END,
            channel: 0,
            target: 0,
            auto_advance: false,
            address: 0,
            len: 0,
            timeout: 0,
            cmp: 0,
            msk: 0,
        }
    }

    /// The comparison operator of the wait opcode in flight, if any.
    pub const fn comparison(&self) -> Option<Comparison> {
        self.op.comparison()
    }

    /// The unconsumed procedure bytes from the working offset `p`.
    ///
    /// During a `WRITE` the transaction payload starts here.
    pub fn payload(&self) -> &'prog [u8] {
        self.program.get(self.p..).unwrap_or(&[])
    }
}
