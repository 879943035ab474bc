//! Encodings of the control-area quadwords between the permission maps and the exit
//! information: ASID and TLB control, virtual interrupts, interrupt shadow and nested
//! paging.

use bitfield::bitfield;
use bitflags::bitflags;

bitflags! {
    /// `np_enable` (offset 0x090).
    pub struct NpEnable: u64 {
        const NESTED_PAGING                     = 1 << 0;
        const SECURE_ENCRYPTED_VIRTUALIZATION   = 1 << 1;
        const ENCRYPTED_STATE                   = 1 << 2;
    }

    /// `interrupt_shadow` (offset 0x068).
    pub struct InterruptShadow: u64 {
        /// The guest is in an interrupt shadow (e.g. right after `STI` or `MOV SS`).
        const INTERRUPT_SHADOW      = 1 << 0;
        /// Value of the guest's RFLAGS.IF, written on #VMEXIT.
        const GUEST_INTERRUPT_MASK  = 1 << 1;
    }
}

/// See `15.16.1 TLB Flush`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlbControl {
    /// 00h: Do nothing.
    DoNothing = 0x00,

    /// 01h: Flush entire TLB (all entries, all ASIDs) on VMRUN.
    /// Should only be used by legacy hypervisors.
    FlushEntireTlb = 0x01,

    /// 03h: Flush this guest’s TLB entries.
    FlushGuestTlb = 0x03,

    /// 07h: Flush this guest’s non-global TLB entries.
    FlushGuestNonGlobalTlb = 0x07,
}

bitfield! {
    /// `guest_asid_tlb_ctl` (offset 0x058).
    ///
    /// ASID 0 is reserved for the host and makes `VMRUN` fail.
    pub struct GuestAsidTlbControl(u64);
    impl Debug;
    pub u32, asid, set_asid: 31, 0;                 // [0-31]
    pub u8, tlb_control, set_tlb_control: 39, 32;   // [32-39]
    // Reserved                                     // [40-63]
}

impl From<u64> for GuestAsidTlbControl {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<GuestAsidTlbControl> for u64 {
    fn from(value: GuestAsidTlbControl) -> Self {
        value.0
    }
}

impl GuestAsidTlbControl {
    pub fn new(asid: u32, tlb_control: TlbControl) -> Self {
        let mut value = GuestAsidTlbControl(0);
        value.set_asid(asid);
        value.set_tlb_control(tlb_control as u8);

        value
    }
}

bitfield! {
    /// `interrupt_ctl` (offset 0x060). See `15.21 Interrupt and LocalAPIC Support`.
    pub struct VirtualInterruptControl(u64);
    impl Debug;
    pub u8, v_tpr, set_v_tpr: 7, 0;                 // [0-7]
    pub v_irq, set_v_irq: 8;                        // [8]
    // Reserved                                     // [9-15]
    pub u8, v_intr_prio, set_v_intr_prio: 19, 16;   // [16-19]
    pub v_ign_tpr, set_v_ign_tpr: 20;               // [20]
    // Reserved                                     // [21-23]
    pub v_intr_masking, set_v_intr_masking: 24;     // [24]
    // Reserved                                     // [25-31]
    pub u8, v_intr_vector, set_v_intr_vector: 39, 32; // [32-39]
    // Reserved                                     // [40-63]
}

impl From<u64> for VirtualInterruptControl {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<VirtualInterruptControl> for u64 {
    fn from(value: VirtualInterruptControl) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::Vmcb;

    #[test]
    fn test_guest_asid_tlb_control() {
        let value = GuestAsidTlbControl::new(1, TlbControl::FlushGuestTlb);
        assert_eq!(value.0, 0x0000_0003_0000_0001);
        assert_eq!(value.asid(), 1);
        assert_eq!(value.tlb_control(), 3);

        let value = GuestAsidTlbControl::new(0xffff_ffff, TlbControl::FlushGuestNonGlobalTlb);
        assert_eq!(value.0, 0x0000_0007_ffff_ffff);

        let mut vmcb = Vmcb::new_zeroed();
        vmcb.control_area.guest_asid_tlb_ctl = GuestAsidTlbControl::new(4, TlbControl::DoNothing).into();
        assert_eq!(&vmcb.as_bytes()[0x58..0x60], &[4, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_virtual_interrupt_control() {
        let mut value = VirtualInterruptControl(0);
        value.set_v_irq(true);
        value.set_v_intr_prio(0xf);
        value.set_v_intr_vector(0x20);
        assert_eq!(value.0, 0x0000_0020_000f_0100);

        value.set_v_intr_masking(true);
        assert_eq!(value.0, 0x0000_0020_010f_0100);
        assert!(!value.v_ign_tpr());
        assert_eq!(value.v_tpr(), 0);
    }

    #[test]
    fn test_np_enable_matches_vmcb_query() {
        let mut vmcb = Vmcb::new_zeroed();

        vmcb.control_area.np_enable = NpEnable::ENCRYPTED_STATE.bits();
        assert!(!vmcb.np_enabled());

        vmcb.control_area.np_enable |= NpEnable::NESTED_PAGING.bits();
        assert!(vmcb.np_enabled());
    }

    #[test]
    fn test_interrupt_shadow() {
        let shadow = InterruptShadow::from_bits_truncate(0b11);
        assert!(shadow.contains(InterruptShadow::INTERRUPT_SHADOW));
        assert!(shadow.contains(InterruptShadow::GUEST_INTERRUPT_MASK));
    }
}
