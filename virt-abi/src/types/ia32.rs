//! 32-bit x86.

use super::Arch;

/// The ia32 port. Physical addresses beyond 4 GiB (PAE) are not representable as an
/// [`Arch::Address`] here; 64-bit physical addresses in hardware tables use
/// [`super::Unsigned64`] instead.
#[derive(Debug, Clone, Copy)]
pub enum Ia32 {}

impl Arch for Ia32 {
    type Mword = u32;
    type Smword = i32;
    type Address = u32;

    const MWORD_BITS: u32 = 32;
    const PAGE_SHIFT: u32 = 12;
}
