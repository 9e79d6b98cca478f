//! Runtime interpreter error implementation

use iovm_asm::FaultReason;

use thiserror::Error;

use crate::state::ExecState;

/// Interpreter runtime error variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VmError {
    /// The requested control operation is not permitted in the current
    /// execution state.
    #[error("operation not permitted in execution state {0:?}")]
    InvalidOperationForState(ExecState),
    /// An instruction's operands overran the program buffer.
    #[error("instruction at offset {offset} overruns the program buffer")]
    OutOfRange {
        /// Program offset of the truncated instruction.
        offset: usize,
    },
    /// The instruction byte decoded to the reserved opcode slot.
    #[error("unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode {
        /// The offending instruction byte.
        opcode: u8,
        /// Program offset of the instruction.
        offset: usize,
    },
    /// The host reported a fault while driving a transaction.
    #[error("host fault: {0}")]
    Fault(FaultReason),
}

impl VmError {
    /// Project the error onto its flat fault code.
    pub const fn reason(&self) -> FaultReason {
        match self {
            Self::InvalidOperationForState(_) => FaultReason::InvalidOperationForState,
            Self::OutOfRange { .. } => FaultReason::OutOfRange,
            Self::UnknownOpcode { .. } => FaultReason::UnknownOpcode,
            Self::Fault(reason) => *reason,
        }
    }
}

impl From<FaultReason> for VmError {
    fn from(reason: FaultReason) -> Self {
        Self::Fault(reason)
    }
}
