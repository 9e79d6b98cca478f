//! Byte-coded virtual machine for low-latency I/O sequences against
//! host-provided memory targets.
//!
//! A client submits a compact procedure as a byte string; the interpreter
//! executes it deterministically, delegating each memory transaction to a
//! [`host::Host`] adapter through a shared [`callback::CallbackState`]
//! record. Transactions complete cooperatively across many invocations of
//! [`interpreter::Interpreter::exec`]; the VM itself never blocks and never
//! allocates.

pub mod callback;
pub mod consts;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod registers;
pub mod state;
pub mod verify;

pub mod prelude {
    //! Common surface of the crate.

    pub use iovm_asm::{Address, Channel, Comparison, FaultReason, Instruction, Opcode, OpcodeRepr, Tv};

    pub use crate::callback::CallbackState;
    pub use crate::error::VmError;
    pub use crate::host::{Host, MemoryHost};
    pub use crate::interpreter::Interpreter;
    pub use crate::registers::ChannelRegisters;
    pub use crate::state::ExecState;
    pub use crate::verify::{preflight, ProgramSummary};
}
