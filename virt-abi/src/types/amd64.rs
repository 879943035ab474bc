//! x86-64 (long mode).

use super::Arch;

/// The amd64 port.
#[derive(Debug, Clone, Copy)]
pub enum Amd64 {}

impl Arch for Amd64 {
    type Mword = u64;
    type Smword = i64;
    type Address = u64;

    const MWORD_BITS: u32 = 64;
    const PAGE_SHIFT: u32 = 12;
}
