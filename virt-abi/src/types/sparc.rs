//! 32-bit SPARC (V8).

use super::Arch;

/// The 32-bit SPARC port.
#[derive(Debug, Clone, Copy)]
pub enum Sparc {}

impl Arch for Sparc {
    type Mword = u32;
    type Smword = i32;
    type Address = u32;

    const MWORD_BITS: u32 = 32;
    const PAGE_SHIFT: u32 = 12;
}
