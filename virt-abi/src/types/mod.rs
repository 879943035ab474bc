//! Primitive types with architecture-dependent widths.
//!
//! The fixed-width aliases are the same everywhere. The machine word and the address
//! type come from the [`Arch`] implementation selected for the compile target; only
//! that one architecture's flat aliases ([`Mword`], [`Smword`], [`Address`]) exist in a
//! given build.

use cfg_if::cfg_if;
use core::{fmt::Debug, mem::size_of};

mod amd64;
mod ia32;
mod sparc;

pub use amd64::Amd64;
pub use ia32::Ia32;
pub use sparc::Sparc;

pub type Unsigned8 = u8;
pub type Signed8 = i8;
pub type Unsigned16 = u16;
pub type Signed16 = i16;
pub type Unsigned32 = u32;
pub type Signed32 = i32;
pub type Unsigned64 = u64;
pub type Signed64 = i64;

pub type CpuTime = Unsigned64;

const_assert_eq!(size_of::<Unsigned8>(), 1);
const_assert_eq!(size_of::<Signed8>(), 1);
const_assert_eq!(size_of::<Unsigned16>(), 2);
const_assert_eq!(size_of::<Signed16>(), 2);
const_assert_eq!(size_of::<Unsigned32>(), 4);
const_assert_eq!(size_of::<Signed32>(), 4);
const_assert_eq!(size_of::<Unsigned64>(), 8);
const_assert_eq!(size_of::<Signed64>(), 8);

/// Primitive type definitions of one architecture port.
///
/// Implemented by uninhabited marker types, so the definitions can be named as a
/// generic parameter but never exist as values.
pub trait Arch {
    /// Unsigned machine word. Its width is the native register width.
    type Mword: Copy + Eq + Ord + Debug;

    /// Signed machine word.
    type Smword: Copy + Eq + Ord + Debug;

    /// Virtual or physical address.
    type Address: Copy + Eq + Ord + Debug;

    const MWORD_BITS: u32;
    const PAGE_SHIFT: u32;
}

cfg_if! {
    if #[cfg(target_arch = "sparc")] {
        /// The architecture this build targets.
        pub type Target = Sparc;
    } else if #[cfg(target_arch = "x86")] {
        /// The architecture this build targets.
        pub type Target = Ia32;
    } else if #[cfg(target_arch = "x86_64")] {
        /// The architecture this build targets.
        pub type Target = Amd64;
    } else {
        compile_error!("no primitive type definitions for this target architecture");
    }
}

pub type Mword = <Target as Arch>::Mword;
pub type Smword = <Target as Arch>::Smword;
pub type Address = <Target as Arch>::Address;

pub const MWORD_BITS: u32 = <Target as Arch>::MWORD_BITS;
pub const PAGE_SHIFT: u32 = <Target as Arch>::PAGE_SHIFT;
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;

// The selected port has to describe the machine we are actually compiled for.
const_assert_eq!(size_of::<Mword>() * 8, MWORD_BITS as usize);
const_assert_eq!(size_of::<Smword>(), size_of::<Mword>());
const_assert_eq!(size_of::<Mword>(), size_of::<usize>());
const_assert!(size_of::<Address>() >= size_of::<usize>());
