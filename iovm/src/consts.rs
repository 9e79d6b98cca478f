//! Interpreter-wide constants.

/// Number of channel register slots selectable by an instruction byte.
pub const VM_CHANNEL_COUNT: usize = 4;

/// Mask applied to the 24-bit address registers.
pub const VM_ADDRESS_MASK: u32 = 0x00ff_ffff;

/// Transfer length encoded by a zero `SETLEN` immediate.
pub const VM_MAX_TRANSFER_LEN: u32 = 65536;
