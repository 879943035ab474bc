use crate::types::{Unsigned16, Unsigned32, Unsigned64, Unsigned8};
use core::{
    fmt,
    mem::{offset_of, size_of},
    ops::Range,
};

pub const STATE_SAVE_AREA_SIZE: usize = 0xc00;

/// See `Table B-2. VMCB Layout, State Save Area`. Offsets are relative to the
/// state-save area, not the VMCB as a whole.
///
/// Only RAX of the general-purpose registers lives here. The remaining ones have to
/// be saved and restored by the hypervisor around `VMRUN`.
///
/// Segment attributes are kept in the packed VMCB format (descriptor bits 8..=15 and
/// 52..=55 squeezed into 12 bits); converting from and to descriptors is up to the
/// caller.
// Size: 0xc00
#[repr(C)]
#[derive(Clone)]
pub struct VmcbStateSaveArea {
    pub es_selector: Unsigned16, // +0x000
    pub es_attrib: Unsigned16,
    pub es_limit: Unsigned32,
    pub es_base: Unsigned64,

    pub cs_selector: Unsigned16, // +0x010
    pub cs_attrib: Unsigned16,
    pub cs_limit: Unsigned32,
    pub cs_base: Unsigned64,

    pub ss_selector: Unsigned16, // +0x020
    pub ss_attrib: Unsigned16,
    pub ss_limit: Unsigned32,
    pub ss_base: Unsigned64,

    pub ds_selector: Unsigned16, // +0x030
    pub ds_attrib: Unsigned16,
    pub ds_limit: Unsigned32,
    pub ds_base: Unsigned64,

    pub fs_selector: Unsigned16, // +0x040
    pub fs_attrib: Unsigned16,
    pub fs_limit: Unsigned32,
    pub fs_base: Unsigned64,

    pub gs_selector: Unsigned16, // +0x050
    pub gs_attrib: Unsigned16,
    pub gs_limit: Unsigned32,
    pub gs_base: Unsigned64,

    pub gdtr_selector: Unsigned16, // +0x060
    pub gdtr_attrib: Unsigned16,
    pub gdtr_limit: Unsigned32,
    pub gdtr_base: Unsigned64,

    pub ldtr_selector: Unsigned16, // +0x070
    pub ldtr_attrib: Unsigned16,
    pub ldtr_limit: Unsigned32,
    pub ldtr_base: Unsigned64,

    pub idtr_selector: Unsigned16, // +0x080
    pub idtr_attrib: Unsigned16,
    pub idtr_limit: Unsigned32,
    pub idtr_base: Unsigned64,

    pub tr_selector: Unsigned16, // +0x090
    pub tr_attrib: Unsigned16,
    pub tr_limit: Unsigned32,
    pub tr_base: Unsigned64,

    reserved0: [Unsigned8; 43], // +0x0a0
    pub cpl: Unsigned8,         // +0x0cb
    reserved1: Unsigned32,      // +0x0cc

    pub efer: Unsigned64,        // +0x0d0
    reserved2: [Unsigned8; 112], // +0x0d8

    pub cr4: Unsigned64,        // +0x148
    pub cr3: Unsigned64,        // +0x150
    pub cr0: Unsigned64,        // +0x158
    pub dr7: Unsigned64,        // +0x160
    pub dr6: Unsigned64,        // +0x168
    pub rflags: Unsigned64,     // +0x170
    pub rip: Unsigned64,        // +0x178
    reserved3: [Unsigned8; 88], // +0x180

    pub rsp: Unsigned64,        // +0x1d8
    reserved4: [Unsigned8; 24], // +0x1e0

    pub rax: Unsigned64,            // +0x1f8
    pub star: Unsigned64,           // +0x200
    pub lstar: Unsigned64,          // +0x208
    pub cstar: Unsigned64,          // +0x210
    pub sfmask: Unsigned64,         // +0x218
    pub kernel_gs_base: Unsigned64, // +0x220
    pub sysenter_cs: Unsigned64,    // +0x228
    pub sysenter_esp: Unsigned64,   // +0x230
    pub sysenter_eip: Unsigned64,   // +0x238
    pub cr2: Unsigned64,            // +0x240
    reserved5: [Unsigned8; 32],     // +0x248

    pub g_pat: Unsigned64,          // +0x268
    pub dbgctl: Unsigned64,         // +0x270
    pub br_from: Unsigned64,        // +0x278
    pub br_to: Unsigned64,          // +0x280
    pub last_excp_from: Unsigned64, // +0x288
    pub last_excp_to: Unsigned64,   // +0x290
    reserved6: [Unsigned8; 2408],   // +0x298
}

const_assert_eq!(size_of::<VmcbStateSaveArea>(), STATE_SAVE_AREA_SIZE);

const_assert_eq!(offset_of!(VmcbStateSaveArea, es_selector), 0x000);
const_assert_eq!(offset_of!(VmcbStateSaveArea, es_attrib), 0x002);
const_assert_eq!(offset_of!(VmcbStateSaveArea, es_limit), 0x004);
const_assert_eq!(offset_of!(VmcbStateSaveArea, es_base), 0x008);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cs_selector), 0x010);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cs_attrib), 0x012);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cs_limit), 0x014);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cs_base), 0x018);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ss_selector), 0x020);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ss_attrib), 0x022);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ss_limit), 0x024);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ss_base), 0x028);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ds_selector), 0x030);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ds_attrib), 0x032);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ds_limit), 0x034);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ds_base), 0x038);
const_assert_eq!(offset_of!(VmcbStateSaveArea, fs_selector), 0x040);
const_assert_eq!(offset_of!(VmcbStateSaveArea, fs_attrib), 0x042);
const_assert_eq!(offset_of!(VmcbStateSaveArea, fs_limit), 0x044);
const_assert_eq!(offset_of!(VmcbStateSaveArea, fs_base), 0x048);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gs_selector), 0x050);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gs_attrib), 0x052);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gs_limit), 0x054);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gs_base), 0x058);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gdtr_selector), 0x060);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gdtr_attrib), 0x062);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gdtr_limit), 0x064);
const_assert_eq!(offset_of!(VmcbStateSaveArea, gdtr_base), 0x068);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ldtr_selector), 0x070);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ldtr_attrib), 0x072);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ldtr_limit), 0x074);
const_assert_eq!(offset_of!(VmcbStateSaveArea, ldtr_base), 0x078);
const_assert_eq!(offset_of!(VmcbStateSaveArea, idtr_selector), 0x080);
const_assert_eq!(offset_of!(VmcbStateSaveArea, idtr_attrib), 0x082);
const_assert_eq!(offset_of!(VmcbStateSaveArea, idtr_limit), 0x084);
const_assert_eq!(offset_of!(VmcbStateSaveArea, idtr_base), 0x088);
const_assert_eq!(offset_of!(VmcbStateSaveArea, tr_selector), 0x090);
const_assert_eq!(offset_of!(VmcbStateSaveArea, tr_attrib), 0x092);
const_assert_eq!(offset_of!(VmcbStateSaveArea, tr_limit), 0x094);
const_assert_eq!(offset_of!(VmcbStateSaveArea, tr_base), 0x098);
const_assert_eq!(offset_of!(VmcbStateSaveArea, reserved0), 0x0a0);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cpl), 0x0cb);
const_assert_eq!(offset_of!(VmcbStateSaveArea, reserved1), 0x0cc);
const_assert_eq!(offset_of!(VmcbStateSaveArea, efer), 0x0d0);
const_assert_eq!(offset_of!(VmcbStateSaveArea, reserved2), 0x0d8);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cr4), 0x148);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cr3), 0x150);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cr0), 0x158);
const_assert_eq!(offset_of!(VmcbStateSaveArea, dr7), 0x160);
const_assert_eq!(offset_of!(VmcbStateSaveArea, dr6), 0x168);
const_assert_eq!(offset_of!(VmcbStateSaveArea, rflags), 0x170);
const_assert_eq!(offset_of!(VmcbStateSaveArea, rip), 0x178);
const_assert_eq!(offset_of!(VmcbStateSaveArea, reserved3), 0x180);
const_assert_eq!(offset_of!(VmcbStateSaveArea, rsp), 0x1d8);
const_assert_eq!(offset_of!(VmcbStateSaveArea, reserved4), 0x1e0);
const_assert_eq!(offset_of!(VmcbStateSaveArea, rax), 0x1f8);
const_assert_eq!(offset_of!(VmcbStateSaveArea, star), 0x200);
const_assert_eq!(offset_of!(VmcbStateSaveArea, lstar), 0x208);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cstar), 0x210);
const_assert_eq!(offset_of!(VmcbStateSaveArea, sfmask), 0x218);
const_assert_eq!(offset_of!(VmcbStateSaveArea, kernel_gs_base), 0x220);
const_assert_eq!(offset_of!(VmcbStateSaveArea, sysenter_cs), 0x228);
const_assert_eq!(offset_of!(VmcbStateSaveArea, sysenter_esp), 0x230);
const_assert_eq!(offset_of!(VmcbStateSaveArea, sysenter_eip), 0x238);
const_assert_eq!(offset_of!(VmcbStateSaveArea, cr2), 0x240);
const_assert_eq!(offset_of!(VmcbStateSaveArea, reserved5), 0x248);
const_assert_eq!(offset_of!(VmcbStateSaveArea, g_pat), 0x268);
const_assert_eq!(offset_of!(VmcbStateSaveArea, dbgctl), 0x270);
const_assert_eq!(offset_of!(VmcbStateSaveArea, br_from), 0x278);
const_assert_eq!(offset_of!(VmcbStateSaveArea, br_to), 0x280);
const_assert_eq!(offset_of!(VmcbStateSaveArea, last_excp_from), 0x288);
const_assert_eq!(offset_of!(VmcbStateSaveArea, last_excp_to), 0x290);
const_assert_eq!(offset_of!(VmcbStateSaveArea, reserved6), 0x298);

impl VmcbStateSaveArea {
    /// Byte ranges, relative to the start of the state-save area, that software must
    /// neither read nor write.
    pub const RESERVED: [Range<usize>; 7] = [
        offset_of!(VmcbStateSaveArea, reserved0)..offset_of!(VmcbStateSaveArea, cpl),
        offset_of!(VmcbStateSaveArea, reserved1)..offset_of!(VmcbStateSaveArea, efer),
        offset_of!(VmcbStateSaveArea, reserved2)..offset_of!(VmcbStateSaveArea, cr4),
        offset_of!(VmcbStateSaveArea, reserved3)..offset_of!(VmcbStateSaveArea, rsp),
        offset_of!(VmcbStateSaveArea, reserved4)..offset_of!(VmcbStateSaveArea, rax),
        offset_of!(VmcbStateSaveArea, reserved5)..offset_of!(VmcbStateSaveArea, g_pat),
        offset_of!(VmcbStateSaveArea, reserved6)..STATE_SAVE_AREA_SIZE,
    ];

    pub const fn new() -> Self {
        Self {
            es_selector: 0,
            es_attrib: 0,
            es_limit: 0,
            es_base: 0,
            cs_selector: 0,
            cs_attrib: 0,
            cs_limit: 0,
            cs_base: 0,
            ss_selector: 0,
            ss_attrib: 0,
            ss_limit: 0,
            ss_base: 0,
            ds_selector: 0,
            ds_attrib: 0,
            ds_limit: 0,
            ds_base: 0,
            fs_selector: 0,
            fs_attrib: 0,
            fs_limit: 0,
            fs_base: 0,
            gs_selector: 0,
            gs_attrib: 0,
            gs_limit: 0,
            gs_base: 0,
            gdtr_selector: 0,
            gdtr_attrib: 0,
            gdtr_limit: 0,
            gdtr_base: 0,
            ldtr_selector: 0,
            ldtr_attrib: 0,
            ldtr_limit: 0,
            ldtr_base: 0,
            idtr_selector: 0,
            idtr_attrib: 0,
            idtr_limit: 0,
            idtr_base: 0,
            tr_selector: 0,
            tr_attrib: 0,
            tr_limit: 0,
            tr_base: 0,
            reserved0: [0; 43],
            cpl: 0,
            reserved1: 0,
            efer: 0,
            reserved2: [0; 112],
            cr4: 0,
            cr3: 0,
            cr0: 0,
            dr7: 0,
            dr6: 0,
            rflags: 0,
            rip: 0,
            reserved3: [0; 88],
            rsp: 0,
            reserved4: [0; 24],
            rax: 0,
            star: 0,
            lstar: 0,
            cstar: 0,
            sfmask: 0,
            kernel_gs_base: 0,
            sysenter_cs: 0,
            sysenter_esp: 0,
            sysenter_eip: 0,
            cr2: 0,
            reserved5: [0; 32],
            g_pat: 0,
            dbgctl: 0,
            br_from: 0,
            br_to: 0,
            last_excp_from: 0,
            last_excp_to: 0,
            reserved6: [0; 2408],
        }
    }
}

impl Default for VmcbStateSaveArea {
    fn default() -> Self {
        Self::new()
    }
}

/// Selector, attributes, limit and base of one segment register.
struct Segment(Unsigned16, Unsigned16, Unsigned32, Unsigned64);

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ selector: {:#x}, attrib: {:#x}, limit: {:#x}, base: {:#x} }}",
            self.0, self.1, self.2, self.3
        )
    }
}

impl fmt::Debug for VmcbStateSaveArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VmcbStateSaveArea")
            .field("es", &Segment(self.es_selector, self.es_attrib, self.es_limit, self.es_base))
            .field("cs", &Segment(self.cs_selector, self.cs_attrib, self.cs_limit, self.cs_base))
            .field("ss", &Segment(self.ss_selector, self.ss_attrib, self.ss_limit, self.ss_base))
            .field("ds", &Segment(self.ds_selector, self.ds_attrib, self.ds_limit, self.ds_base))
            .field("fs", &Segment(self.fs_selector, self.fs_attrib, self.fs_limit, self.fs_base))
            .field("gs", &Segment(self.gs_selector, self.gs_attrib, self.gs_limit, self.gs_base))
            .field("gdtr", &Segment(self.gdtr_selector, self.gdtr_attrib, self.gdtr_limit, self.gdtr_base))
            .field("ldtr", &Segment(self.ldtr_selector, self.ldtr_attrib, self.ldtr_limit, self.ldtr_base))
            .field("idtr", &Segment(self.idtr_selector, self.idtr_attrib, self.idtr_limit, self.idtr_base))
            .field("tr", &Segment(self.tr_selector, self.tr_attrib, self.tr_limit, self.tr_base))
            .field("cpl", &format_args!("{:#x}", self.cpl))
            .field("efer", &format_args!("{:#x}", self.efer))
            .field("cr4", &format_args!("{:#x}", self.cr4))
            .field("cr3", &format_args!("{:#x}", self.cr3))
            .field("cr0", &format_args!("{:#x}", self.cr0))
            .field("dr7", &format_args!("{:#x}", self.dr7))
            .field("dr6", &format_args!("{:#x}", self.dr6))
            .field("rflags", &format_args!("{:#x}", self.rflags))
            .field("rip", &format_args!("{:#x}", self.rip))
            .field("rsp", &format_args!("{:#x}", self.rsp))
            .field("rax", &format_args!("{:#x}", self.rax))
            .field("star", &format_args!("{:#x}", self.star))
            .field("lstar", &format_args!("{:#x}", self.lstar))
            .field("cstar", &format_args!("{:#x}", self.cstar))
            .field("sfmask", &format_args!("{:#x}", self.sfmask))
            .field("kernel_gs_base", &format_args!("{:#x}", self.kernel_gs_base))
            .field("sysenter_cs", &format_args!("{:#x}", self.sysenter_cs))
            .field("sysenter_esp", &format_args!("{:#x}", self.sysenter_esp))
            .field("sysenter_eip", &format_args!("{:#x}", self.sysenter_eip))
            .field("cr2", &format_args!("{:#x}", self.cr2))
            .field("g_pat", &format_args!("{:#x}", self.g_pat))
            .field("dbgctl", &format_args!("{:#x}", self.dbgctl))
            .field("br_from", &format_args!("{:#x}", self.br_from))
            .field("br_to", &format_args!("{:#x}", self.br_to))
            .field("last_excp_from", &format_args!("{:#x}", self.last_excp_from))
            .field("last_excp_to", &format_args!("{:#x}", self.last_excp_to))
            .finish_non_exhaustive()
    }
}
