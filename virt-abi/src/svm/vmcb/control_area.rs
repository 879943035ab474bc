use crate::types::{Unsigned16, Unsigned32, Unsigned64, Unsigned8};
use core::{
    fmt,
    mem::{offset_of, size_of},
    ops::Range,
};

pub const CONTROL_AREA_SIZE: usize = 0x400;

/// See `Table B-1. VMCB Layout, Control Area`.
///
/// Every field is a raw integer; use the types in [`crate::svm::intercept`],
/// [`crate::svm::control`], [`crate::svm::events`] and [`crate::svm::exit`] to compose
/// or decode them.
// Size: 0x400
#[repr(C)]
#[derive(Clone)]
pub struct VmcbControlArea {
    pub intercept_rd_crx: Unsigned16,     // +0x000
    pub intercept_wr_crx: Unsigned16,     // +0x002
    pub intercept_rd_drx: Unsigned16,     // +0x004
    pub intercept_wr_drx: Unsigned16,     // +0x006
    pub intercept_exceptions: Unsigned32, // +0x008

    pub intercept_instruction0: Unsigned32, // +0x00c
    pub intercept_instruction1: Unsigned32, // +0x010
    reserved0: [Unsigned8; 44],             // +0x014

    pub iopm_base_pa: Unsigned64,       // +0x040
    pub msrpm_base_pa: Unsigned64,      // +0x048
    pub tsc_offset: Unsigned64,         // +0x050
    pub guest_asid_tlb_ctl: Unsigned64, // +0x058
    pub interrupt_ctl: Unsigned64,      // +0x060
    pub interrupt_shadow: Unsigned64,   // +0x068

    /// Written by the processor on #VMEXIT.
    pub exitcode: Unsigned64, // +0x070
    /// Written by the processor on #VMEXIT.
    pub exitinfo1: Unsigned64, // +0x078
    /// Written by the processor on #VMEXIT.
    pub exitinfo2: Unsigned64, // +0x080
    /// Event that was being delivered when the #VMEXIT happened.
    pub exitintinfo: Unsigned64, // +0x088

    /// Bit 0 enables nested paging.
    pub np_enable: Unsigned64, // +0x090
    reserved1: [Unsigned8; 16], // +0x098

    pub eventinj: Unsigned64,                  // +0x0a8
    pub n_cr3: Unsigned64,                     // +0x0b0
    pub lbr_virtualization_enable: Unsigned64, // +0x0b8
    reserved2: [Unsigned8; 832],               // +0x0c0
}

const_assert_eq!(size_of::<VmcbControlArea>(), CONTROL_AREA_SIZE);

const_assert_eq!(offset_of!(VmcbControlArea, intercept_rd_crx), 0x000);
const_assert_eq!(offset_of!(VmcbControlArea, intercept_wr_crx), 0x002);
const_assert_eq!(offset_of!(VmcbControlArea, intercept_rd_drx), 0x004);
const_assert_eq!(offset_of!(VmcbControlArea, intercept_wr_drx), 0x006);
const_assert_eq!(offset_of!(VmcbControlArea, intercept_exceptions), 0x008);
const_assert_eq!(offset_of!(VmcbControlArea, intercept_instruction0), 0x00c);
const_assert_eq!(offset_of!(VmcbControlArea, intercept_instruction1), 0x010);
const_assert_eq!(offset_of!(VmcbControlArea, reserved0), 0x014);
const_assert_eq!(offset_of!(VmcbControlArea, iopm_base_pa), 0x040);
const_assert_eq!(offset_of!(VmcbControlArea, msrpm_base_pa), 0x048);
const_assert_eq!(offset_of!(VmcbControlArea, tsc_offset), 0x050);
const_assert_eq!(offset_of!(VmcbControlArea, guest_asid_tlb_ctl), 0x058);
const_assert_eq!(offset_of!(VmcbControlArea, interrupt_ctl), 0x060);
const_assert_eq!(offset_of!(VmcbControlArea, interrupt_shadow), 0x068);
const_assert_eq!(offset_of!(VmcbControlArea, exitcode), 0x070);
const_assert_eq!(offset_of!(VmcbControlArea, exitinfo1), 0x078);
const_assert_eq!(offset_of!(VmcbControlArea, exitinfo2), 0x080);
const_assert_eq!(offset_of!(VmcbControlArea, exitintinfo), 0x088);
const_assert_eq!(offset_of!(VmcbControlArea, np_enable), 0x090);
const_assert_eq!(offset_of!(VmcbControlArea, reserved1), 0x098);
const_assert_eq!(offset_of!(VmcbControlArea, eventinj), 0x0a8);
const_assert_eq!(offset_of!(VmcbControlArea, n_cr3), 0x0b0);
const_assert_eq!(offset_of!(VmcbControlArea, lbr_virtualization_enable), 0x0b8);
const_assert_eq!(offset_of!(VmcbControlArea, reserved2), 0x0c0);

impl VmcbControlArea {
    /// Byte ranges, relative to the start of the control area, that software must
    /// neither read nor write.
    pub const RESERVED: [Range<usize>; 3] = [
        offset_of!(VmcbControlArea, reserved0)..offset_of!(VmcbControlArea, iopm_base_pa),
        offset_of!(VmcbControlArea, reserved1)..offset_of!(VmcbControlArea, eventinj),
        offset_of!(VmcbControlArea, reserved2)..CONTROL_AREA_SIZE,
    ];

    pub const fn new() -> Self {
        Self {
            intercept_rd_crx: 0,
            intercept_wr_crx: 0,
            intercept_rd_drx: 0,
            intercept_wr_drx: 0,
            intercept_exceptions: 0,
            intercept_instruction0: 0,
            intercept_instruction1: 0,
            reserved0: [0; 44],
            iopm_base_pa: 0,
            msrpm_base_pa: 0,
            tsc_offset: 0,
            guest_asid_tlb_ctl: 0,
            interrupt_ctl: 0,
            interrupt_shadow: 0,
            exitcode: 0,
            exitinfo1: 0,
            exitinfo2: 0,
            exitintinfo: 0,
            np_enable: 0,
            reserved1: [0; 16],
            eventinj: 0,
            n_cr3: 0,
            lbr_virtualization_enable: 0,
            reserved2: [0; 832],
        }
    }
}

impl Default for VmcbControlArea {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VmcbControlArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VmcbControlArea")
            .field("intercept_rd_crx", &format_args!("{:#x}", self.intercept_rd_crx))
            .field("intercept_wr_crx", &format_args!("{:#x}", self.intercept_wr_crx))
            .field("intercept_rd_drx", &format_args!("{:#x}", self.intercept_rd_drx))
            .field("intercept_wr_drx", &format_args!("{:#x}", self.intercept_wr_drx))
            .field("intercept_exceptions", &format_args!("{:#x}", self.intercept_exceptions))
            .field("intercept_instruction0", &format_args!("{:#x}", self.intercept_instruction0))
            .field("intercept_instruction1", &format_args!("{:#x}", self.intercept_instruction1))
            .field("iopm_base_pa", &format_args!("{:#x}", self.iopm_base_pa))
            .field("msrpm_base_pa", &format_args!("{:#x}", self.msrpm_base_pa))
            .field("tsc_offset", &format_args!("{:#x}", self.tsc_offset))
            .field("guest_asid_tlb_ctl", &format_args!("{:#x}", self.guest_asid_tlb_ctl))
            .field("interrupt_ctl", &format_args!("{:#x}", self.interrupt_ctl))
            .field("interrupt_shadow", &format_args!("{:#x}", self.interrupt_shadow))
            .field("exitcode", &format_args!("{:#x}", self.exitcode))
            .field("exitinfo1", &format_args!("{:#x}", self.exitinfo1))
            .field("exitinfo2", &format_args!("{:#x}", self.exitinfo2))
            .field("exitintinfo", &format_args!("{:#x}", self.exitintinfo))
            .field("np_enable", &format_args!("{:#x}", self.np_enable))
            .field("eventinj", &format_args!("{:#x}", self.eventinj))
            .field("n_cr3", &format_args!("{:#x}", self.n_cr3))
            .field("lbr_virtualization_enable", &format_args!("{:#x}", self.lbr_virtualization_enable))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ranges() {
        let [r0, r1, r2] = VmcbControlArea::RESERVED;
        assert_eq!(r0, 0x014..0x040);
        assert_eq!(r1, 0x098..0x0a8);
        assert_eq!(r2, 0x0c0..0x400);

        assert_eq!(r0.len(), 44);
        assert_eq!(r1.len(), 16);
        assert_eq!(r2.len(), 832);
    }

    #[test]
    fn test_fields_and_reserved_cover_area() {
        // Named fields plus reserved bytes add up to the area: nothing is padding.
        let named = 4 * size_of::<Unsigned16>()
            + 3 * size_of::<Unsigned32>()
            + 14 * size_of::<Unsigned64>();
        let reserved: usize = VmcbControlArea::RESERVED.iter().map(|r| r.len()).sum();

        assert_eq!(named + reserved, CONTROL_AREA_SIZE);
    }

    #[test]
    fn test_new_is_zeroed() {
        let area = VmcbControlArea::new();
        assert_eq!(area.exitcode, 0);
        assert_eq!(area.np_enable, 0);
        assert!(area.reserved2.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_debug_omits_reserved() {
        let mut area = VmcbControlArea::default();
        area.exitcode = 0x72;

        let debug = format!("{:?}", area);
        assert!(debug.contains("exitcode: 0x72"));
        assert!(!debug.contains("reserved"));
    }
}
