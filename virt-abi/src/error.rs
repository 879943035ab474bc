use crate::types::Address;
use snafu::prelude::*;

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum VmcbError {
    #[snafu(display("VMCB page has {} bytes, expected exactly one 4 KiB page", size))]
    InvalidSize { size: usize },

    #[snafu(display("VMCB page at {:#x} is not 4 KiB aligned", address))]
    Misaligned { address: Address },

    #[snafu(display("Failed to allocate memory for the VMCB"))]
    AllocationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            VmcbError::InvalidSize { size: 12 }.to_string(),
            "VMCB page has 12 bytes, expected exactly one 4 KiB page"
        );
        assert_eq!(
            VmcbError::Misaligned { address: 0x1001 }.to_string(),
            "VMCB page at 0x1001 is not 4 KiB aligned"
        );
        assert_eq!(
            VmcbError::AllocationFailed.to_string(),
            "Failed to allocate memory for the VMCB"
        );
    }
}
