//! Per-channel register file.

use iovm_asm::{Address, Tv};

use crate::consts::{VM_ADDRESS_MASK, VM_MAX_TRANSFER_LEN};

/// Register slot of one channel.
///
/// The encoding is deliberately sparse: constants are loaded by the `SET*`
/// opcodes so a procedure can reuse an established setup across many I/O
/// instructions on the same channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelRegisters {
    address: Address,
    tv: Tv,
    len: u32,
    cmp: u8,
    msk: u8,
    timeout: u32,
}

impl ChannelRegisters {
    /// 24-bit start address of the next transaction.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Target/flags register.
    pub const fn tv(&self) -> Tv {
        self.tv
    }

    /// Transfer length in bytes, `1..=65536` once set.
    pub const fn transfer_len(&self) -> u32 {
        self.len
    }

    /// Comparison value for the wait opcodes.
    pub const fn cmp(&self) -> u8 {
        self.cmp
    }

    /// Comparison mask for the wait opcodes.
    pub const fn msk(&self) -> u8 {
        self.msk
    }

    /// Wait timeout in host ticks.
    pub const fn timeout(&self) -> u32 {
        self.timeout
    }

    pub(crate) fn set_address(&mut self, address: Address) {
        self.address = address & VM_ADDRESS_MASK;
    }

    pub(crate) fn set_tv(&mut self, tv: Tv) {
        self.tv = tv;
    }

    /// Store a raw length operand; zero encodes the maximum transfer.
    pub(crate) fn set_transfer_len(&mut self, raw: u16) {
        self.len = match raw {
            0 => VM_MAX_TRANSFER_LEN,
            n => n as u32,
        };
    }

    pub(crate) fn set_cmp_msk(&mut self, cmp: u8, msk: u8) {
        self.cmp = cmp;
        self.msk = msk;
    }

    pub(crate) fn set_timeout(&mut self, timeout: u32) {
        self.timeout = timeout;
    }
}

impl Default for ChannelRegisters {
    fn default() -> Self {
        Self {
            address: 0,
            tv: Tv::default(),
            len: 0,
            cmp: 0,
            msk: 0xff,
            timeout: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_values_match_the_register_model() {
        let regs = ChannelRegisters::default();

        assert_eq!(0, regs.address());
        assert_eq!(0, regs.tv().to_u8());
        assert_eq!(0, regs.transfer_len());
        assert_eq!(0, regs.cmp());
        assert_eq!(0xff, regs.msk());
        assert_eq!(0, regs.timeout());
    }

    #[test]
    fn zero_length_operand_encodes_the_maximum() {
        let mut regs = ChannelRegisters::default();

        regs.set_transfer_len(0);
        assert_eq!(VM_MAX_TRANSFER_LEN, regs.transfer_len());

        regs.set_transfer_len(1);
        assert_eq!(1, regs.transfer_len());

        regs.set_transfer_len(0xffff);
        assert_eq!(0xffff, regs.transfer_len());
    }

    #[test]
    fn addresses_are_masked_to_24_bits() {
        let mut regs = ChannelRegisters::default();

        regs.set_address(0xff12_3456);
        assert_eq!(0x0012_3456, regs.address());
    }
}
