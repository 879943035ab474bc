//! Hardware-defined virtualization structures and the primitive types they are built from.
//!
//! Everything in here is passive data: the layouts are checked against the vendor
//! documentation at build time and nothing is validated at run time.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")] extern crate alloc;

#[macro_use] extern crate static_assertions;

pub mod error;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))] pub mod svm;
pub mod types;
