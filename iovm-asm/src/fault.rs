use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[non_exhaustive]
/// Fault code representation for the interpreter and its host collaborators.
pub enum FaultReason {
    /// The byte can't be mapped to any known `FaultReason`.
    UnknownFaultReason = 0x00,
    /// An instruction or its operands overran the program buffer, or an
    /// argument was outside its encodable range.
    OutOfRange = 0x01,
    /// The requested control operation is not permitted in the current
    /// execution state.
    InvalidOperationForState = 0x02,
    /// The instruction byte decoded to the reserved opcode slot.
    UnknownOpcode = 0x03,
    /// A wait opcode's timer elapsed before its predicate released it.
    TimedOut = 0x04,
    /// The host aborted the procedure.
    Aborted = 0x05,
    /// The addressed memory target is not defined on this host.
    MemoryChipUndefined = 0x06,
    /// The transaction's address range falls outside the memory target.
    MemoryChipAddressOutOfRange = 0x07,
    /// The memory target does not permit reads.
    MemoryChipNotReadable = 0x08,
    /// The memory target does not permit writes.
    MemoryChipNotWritable = 0x09,
}

impl fmt::Display for FaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FaultReason {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<u8> for FaultReason {
    /// Converts the `u8` into a `FaultReason`.
    fn from(b: u8) -> Self {
        use FaultReason::*;
        match b {
            0x01 => OutOfRange,
            0x02 => InvalidOperationForState,
            0x03 => UnknownOpcode,
            0x04 => TimedOut,
            0x05 => Aborted,
            0x06 => MemoryChipUndefined,
            0x07 => MemoryChipAddressOutOfRange,
            0x08 => MemoryChipNotReadable,
            0x09 => MemoryChipNotWritable,
            _ => UnknownFaultReason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_u8_fault_reason_round_trip() {
        let last_known_fault_reason: u8 = FaultReason::iter().last().unwrap() as u8 + 1;
        let reason = FaultReason::from(0);
        assert_eq!(reason, FaultReason::UnknownFaultReason);

        for i in 1..last_known_fault_reason {
            let reason = FaultReason::from(i);
            let i2 = reason as u8;
            assert_eq!(i, i2);
        }
        for i in last_known_fault_reason..=255 {
            let reason = FaultReason::from(i);
            let i2 = reason as u8;
            assert_eq!(FaultReason::UnknownFaultReason as u8, i2);
        }
    }
}
