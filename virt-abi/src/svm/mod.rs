//! AMD-V (SVM) hardware structures.

pub mod control;
pub mod events;
pub mod exit;
pub mod intercept;
pub mod vmcb;

pub use vmcb::{
    control_area::VmcbControlArea, save_area::VmcbStateSaveArea, Vmcb, VMCB_ALIGNMENT, VMCB_SIZE,
};
