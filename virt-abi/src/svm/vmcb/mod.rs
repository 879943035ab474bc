//! See `Appendix B - Layout of VMCB` in AMD64 Architecture Programmer’s Manual Volume 2: System Programming.

use crate::{
    error::{InvalidSizeSnafu, MisalignedSnafu, VmcbError},
    svm::vmcb::{
        control_area::{VmcbControlArea, CONTROL_AREA_SIZE},
        save_area::{VmcbStateSaveArea, STATE_SAVE_AREA_SIZE},
    },
    types::Address,
};
use core::mem::{align_of, offset_of, size_of};
use snafu::ensure;

pub mod control_area;
pub mod save_area;

pub const VMCB_SIZE: usize = 0x1000;

/// `VMRUN` faults unless the VMCB physical address is 4 KiB aligned.
pub const VMCB_ALIGNMENT: usize = 0x1000;

/// # Layout
///
/// The VMCB is divided into two areas: the first one contains various control bits including the
/// intercept vectors and the second one contains saved guest state. The processor is handed the
/// physical address of this structure and treats the memory behind it as exactly this
/// concatenation.
///
/// # Ownership
///
/// One VMCB belongs to exactly one virtual CPU. Software touches it before `VMRUN` and after
/// `#VMEXIT`, the processor only in between; nothing in here synchronizes the two.
// Size: 0x1000
#[repr(C, align(4096))]
#[derive(Clone, Debug, Default)]
pub struct Vmcb {
    /// Describes the layout of the control area of the VMCB, which starts at offset zero within the
    /// VMCB page. The control area is padded to a size of 1024 bytes.
    pub control_area: VmcbControlArea,

    /// Describes the fields within the state-save area; note that the fields are laid out
    /// relative to the state-save area (not the VMCB as a whole).
    pub state_save_area: VmcbStateSaveArea,
}

const_assert_eq!(CONTROL_AREA_SIZE + STATE_SAVE_AREA_SIZE, VMCB_SIZE);
const_assert_eq!(size_of::<Vmcb>(), VMCB_SIZE);
const_assert_eq!(align_of::<Vmcb>(), VMCB_ALIGNMENT);
const_assert_eq!(offset_of!(Vmcb, control_area), 0);
const_assert_eq!(offset_of!(Vmcb, state_save_area), CONTROL_AREA_SIZE);

impl Vmcb {
    pub const fn new_zeroed() -> Self {
        Self {
            control_area: VmcbControlArea::new(),
            state_save_area: VmcbStateSaveArea::new(),
        }
    }

    /// Allocates a zeroed VMCB on the heap.
    ///
    /// The block is 4 KiB aligned in virtual memory. Whether its physical address is
    /// usable for `VMRUN` depends on the allocator backing the heap, which has to hand
    /// out physically contiguous pages.
    #[cfg(feature = "alloc")]
    pub fn new() -> Result<alloc::boxed::Box<Self>, VmcbError> {
        use crate::error::AllocationFailedSnafu;
        use alloc::{
            alloc::{alloc_zeroed, Layout},
            boxed::Box,
        };

        let layout = Layout::new::<Self>();

        // SAFETY: The layout has a non-zero size.
        let memory = unsafe { alloc_zeroed(layout) } as *mut Self;
        ensure!(!memory.is_null(), AllocationFailedSnafu);

        log::trace!("Allocated VMCB at {:p}", memory);

        // SAFETY: The memory was allocated by the global allocator with the layout of `Self`,
        // and all-zero bytes are a valid `Vmcb` since it only consists of integers.
        Ok(unsafe { Box::from_raw(memory) })
    }

    /// Interprets a 4 KiB page as a VMCB.
    pub fn from_page(page: &[u8]) -> Result<&Self, VmcbError> {
        Self::check_page(page)?;

        // SAFETY: Size and alignment were checked above and every bit pattern is a valid
        // `Vmcb`.
        Ok(unsafe { &*(page.as_ptr() as *const Self) })
    }

    /// Interprets a 4 KiB page as a VMCB, e.g. a page handed out by a frame allocator.
    pub fn from_page_mut(page: &mut [u8]) -> Result<&mut Self, VmcbError> {
        Self::check_page(page)?;

        log::trace!("Using page at {:p} as VMCB", page.as_ptr());

        // SAFETY: See `from_page`. The exclusive borrow of the page carries over.
        Ok(unsafe { &mut *(page.as_mut_ptr() as *mut Self) })
    }

    fn check_page(page: &[u8]) -> Result<(), VmcbError> {
        ensure!(page.len() == VMCB_SIZE, InvalidSizeSnafu { size: page.len() });

        let address = page.as_ptr() as usize;
        ensure!(
            address % VMCB_ALIGNMENT == 0,
            MisalignedSnafu {
                address: address as Address
            }
        );

        Ok(())
    }

    /// The raw bytes the processor sees.
    pub fn as_bytes(&self) -> &[u8; VMCB_SIZE] {
        // SAFETY: `Vmcb` is exactly `VMCB_SIZE` bytes without padding (see the assertions
        // above) and `u8` has no alignment requirement.
        unsafe { &*(self as *const Self as *const [u8; VMCB_SIZE]) }
    }

    /// Mutable access to the raw bytes, reserved ranges included.
    pub fn as_bytes_mut(&mut self) -> &mut [u8; VMCB_SIZE] {
        // SAFETY: See `as_bytes`. Any byte pattern written is a valid `Vmcb`.
        unsafe { &mut *(self as *mut Self as *mut [u8; VMCB_SIZE]) }
    }

    /// Whether nested paging is enabled, i.e. bit 0 of `np_enable`.
    pub fn np_enabled(&self) -> bool {
        self.control_area.np_enable & 1 != 0
    }
}
