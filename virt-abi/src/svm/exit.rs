//! See `Appendix C - SVM Intercept Exit Codes`.

use core::fmt;

/// Value the processor writes to `exitcode` (offset 0x070) on #VMEXIT.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VmExitCode(pub u64);

impl VmExitCode {
    pub const VMEXIT_CR0_READ: Self = Self::cr_read(0);
    pub const VMEXIT_CR3_READ: Self = Self::cr_read(3);
    pub const VMEXIT_CR0_WRITE: Self = Self::cr_write(0);
    pub const VMEXIT_CR3_WRITE: Self = Self::cr_write(3);
    pub const VMEXIT_CR4_WRITE: Self = Self::cr_write(4);
    pub const VMEXIT_CR8_WRITE: Self = Self::cr_write(8);
    pub const VMEXIT_DR7_WRITE: Self = Self::dr_write(7);

    pub const VMEXIT_EXCEPTION_DB: Self = Self::exception(1);
    pub const VMEXIT_EXCEPTION_BP: Self = Self::exception(3);
    pub const VMEXIT_EXCEPTION_UD: Self = Self::exception(6);
    pub const VMEXIT_EXCEPTION_GP: Self = Self::exception(13);
    pub const VMEXIT_EXCEPTION_PF: Self = Self::exception(14);

    pub const VMEXIT_INTR: Self = Self(0x60);
    pub const VMEXIT_NMI: Self = Self(0x61);
    pub const VMEXIT_SMI: Self = Self(0x62);
    pub const VMEXIT_INIT: Self = Self(0x63);
    pub const VMEXIT_VINTR: Self = Self(0x64);
    pub const VMEXIT_CR0_SEL_WRITE: Self = Self(0x65);
    pub const VMEXIT_IDTR_READ: Self = Self(0x66);
    pub const VMEXIT_GDTR_READ: Self = Self(0x67);
    pub const VMEXIT_LDTR_READ: Self = Self(0x68);
    pub const VMEXIT_TR_READ: Self = Self(0x69);
    pub const VMEXIT_IDTR_WRITE: Self = Self(0x6a);
    pub const VMEXIT_GDTR_WRITE: Self = Self(0x6b);
    pub const VMEXIT_LDTR_WRITE: Self = Self(0x6c);
    pub const VMEXIT_TR_WRITE: Self = Self(0x6d);
    pub const VMEXIT_RDTSC: Self = Self(0x6e);
    pub const VMEXIT_RDPMC: Self = Self(0x6f);
    pub const VMEXIT_PUSHF: Self = Self(0x70);
    pub const VMEXIT_POPF: Self = Self(0x71);
    pub const VMEXIT_CPUID: Self = Self(0x72);
    pub const VMEXIT_RSM: Self = Self(0x73);
    pub const VMEXIT_IRET: Self = Self(0x74);
    pub const VMEXIT_SWINT: Self = Self(0x75);
    pub const VMEXIT_INVD: Self = Self(0x76);
    pub const VMEXIT_PAUSE: Self = Self(0x77);
    pub const VMEXIT_HLT: Self = Self(0x78);
    pub const VMEXIT_INVLPG: Self = Self(0x79);
    pub const VMEXIT_INVLPGA: Self = Self(0x7a);
    pub const VMEXIT_IOIO: Self = Self(0x7b);
    pub const VMEXIT_MSR: Self = Self(0x7c);
    pub const VMEXIT_TASK_SWITCH: Self = Self(0x7d);
    pub const VMEXIT_FERR_FREEZE: Self = Self(0x7e);
    pub const VMEXIT_SHUTDOWN: Self = Self(0x7f);
    pub const VMEXIT_VMRUN: Self = Self(0x80);
    pub const VMEXIT_VMMCALL: Self = Self(0x81);
    pub const VMEXIT_VMLOAD: Self = Self(0x82);
    pub const VMEXIT_VMSAVE: Self = Self(0x83);
    pub const VMEXIT_STGI: Self = Self(0x84);
    pub const VMEXIT_CLGI: Self = Self(0x85);
    pub const VMEXIT_SKINIT: Self = Self(0x86);
    pub const VMEXIT_RDTSCP: Self = Self(0x87);
    pub const VMEXIT_ICEBP: Self = Self(0x88);
    pub const VMEXIT_WBINVD: Self = Self(0x89);
    pub const VMEXIT_MONITOR: Self = Self(0x8a);
    pub const VMEXIT_MWAIT: Self = Self(0x8b);
    pub const VMEXIT_MWAIT_CONDITIONAL: Self = Self(0x8c);
    pub const VMEXIT_XSETBV: Self = Self(0x8d);
    pub const VMEXIT_NPF: Self = Self(0x400);

    /// Invalid guest state in the VMCB. `VMRUN` returns immediately with this code.
    pub const VMEXIT_INVALID: Self = Self(u64::MAX);

    const CR_READ_BASE: u64 = 0x00;
    const CR_WRITE_BASE: u64 = 0x10;
    const DR_READ_BASE: u64 = 0x20;
    const DR_WRITE_BASE: u64 = 0x30;
    const EXCEPTION_BASE: u64 = 0x40;
    const INSTRUCTION_BASE: u64 = 0x60;

    /// Panics at compile time when used in a const with `cr > 15`.
    pub const fn cr_read(cr: u8) -> Self {
        assert!(cr < 16);
        Self(Self::CR_READ_BASE + cr as u64)
    }

    pub const fn cr_write(cr: u8) -> Self {
        assert!(cr < 16);
        Self(Self::CR_WRITE_BASE + cr as u64)
    }

    pub const fn dr_read(dr: u8) -> Self {
        assert!(dr < 16);
        Self(Self::DR_READ_BASE + dr as u64)
    }

    pub const fn dr_write(dr: u8) -> Self {
        assert!(dr < 16);
        Self(Self::DR_WRITE_BASE + dr as u64)
    }

    pub const fn exception(vector: u8) -> Self {
        assert!(vector < 32);
        Self(Self::EXCEPTION_BASE + vector as u64)
    }

    /// Exception vector if this exit was caused by an intercepted exception.
    pub fn exception_vector(self) -> Option<u8> {
        match self.0 {
            0x40..=0x5f => Some((self.0 - Self::EXCEPTION_BASE) as u8),
            _ => None,
        }
    }
}

const INSTRUCTION_NAMES: [&str; 0x2e] = [
    "intr", "nmi", "smi", "init", "vintr", "cr0 selective write", "idtr read", "gdtr read",
    "ldtr read", "tr read", "idtr write", "gdtr write", "ldtr write", "tr write", "rdtsc", "rdpmc",
    "pushf", "popf", "cpuid", "rsm", "iret", "swint", "invd", "pause", "hlt", "invlpg", "invlpga",
    "ioio", "msr", "task switch", "ferr freeze", "shutdown", "vmrun", "vmmcall", "vmload",
    "vmsave", "stgi", "clgi", "skinit", "rdtscp", "icebp", "wbinvd", "monitor", "mwait",
    "mwait conditional", "xsetbv",
];

impl fmt::Display for VmExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            code @ 0x00..=0x0f => write!(f, "cr{} read", code - Self::CR_READ_BASE),
            code @ 0x10..=0x1f => write!(f, "cr{} write", code - Self::CR_WRITE_BASE),
            code @ 0x20..=0x2f => write!(f, "dr{} read", code - Self::DR_READ_BASE),
            code @ 0x30..=0x3f => write!(f, "dr{} write", code - Self::DR_WRITE_BASE),
            code @ 0x40..=0x5f => write!(f, "exception {}", code - Self::EXCEPTION_BASE),
            code @ 0x60..=0x8d => f.write_str(INSTRUCTION_NAMES[(code - Self::INSTRUCTION_BASE) as usize]),
            0x400 => f.write_str("nested page fault"),
            u64::MAX => f.write_str("invalid"),
            code => write!(f, "unknown ({:#x})", code),
        }
    }
}

impl fmt::Debug for VmExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VmExitCode({:#x}: {})", self.0, self)
    }
}

impl From<u64> for VmExitCode {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<VmExitCode> for u64 {
    fn from(value: VmExitCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::Vmcb;

    #[test]
    fn test_ranges() {
        assert_eq!(VmExitCode::VMEXIT_CR3_WRITE.0, 0x13);
        assert_eq!(VmExitCode::dr_read(7).0, 0x27);
        assert_eq!(VmExitCode::VMEXIT_DR7_WRITE.0, 0x37);
        assert_eq!(VmExitCode::VMEXIT_EXCEPTION_BP.0, 0x43);
        assert_eq!(VmExitCode::VMEXIT_EXCEPTION_PF.exception_vector(), Some(14));
        assert_eq!(VmExitCode::VMEXIT_CPUID.exception_vector(), None);
    }

    #[test]
    fn test_instruction_names_line_up() {
        assert_eq!(INSTRUCTION_NAMES.len() as u64, VmExitCode::VMEXIT_XSETBV.0 - 0x60 + 1);
        assert_eq!(VmExitCode::VMEXIT_INTR.to_string(), "intr");
        assert_eq!(VmExitCode::VMEXIT_CPUID.to_string(), "cpuid");
        assert_eq!(VmExitCode::VMEXIT_MSR.to_string(), "msr");
        assert_eq!(VmExitCode::VMEXIT_VMRUN.to_string(), "vmrun");
        assert_eq!(VmExitCode::VMEXIT_XSETBV.to_string(), "xsetbv");
    }

    #[test]
    fn test_display() {
        assert_eq!(VmExitCode::VMEXIT_CR3_WRITE.to_string(), "cr3 write");
        assert_eq!(VmExitCode::exception(14).to_string(), "exception 14");
        assert_eq!(VmExitCode::VMEXIT_NPF.to_string(), "nested page fault");
        assert_eq!(VmExitCode::VMEXIT_INVALID.to_string(), "invalid");
        assert_eq!(VmExitCode(0x200).to_string(), "unknown (0x200)");
        assert_eq!(format!("{:?}", VmExitCode::VMEXIT_HLT), "VmExitCode(0x78: hlt)");
    }

    #[test]
    fn test_decode_from_vmcb() {
        let mut vmcb = Vmcb::new_zeroed();
        vmcb.control_area.exitcode = 0x72;
        assert_eq!(VmExitCode::from(vmcb.control_area.exitcode), VmExitCode::VMEXIT_CPUID);

        vmcb.control_area.exitcode = VmExitCode::VMEXIT_INVALID.into();
        assert_eq!(&vmcb.as_bytes()[0x70..0x78], &[0xff; 8]);
    }
}
