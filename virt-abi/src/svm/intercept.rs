//! Bit positions of the intercept vectors at the start of the control area.
//!
//! See `Table B-1. VMCB Layout, Control Area`. Write them with `.bits()`, e.g.
//! `vmcb.control_area.intercept_instruction0 |= InterceptInstruction0::CPUID.bits()`.

use bitflags::bitflags;

bitflags! {
    /// `intercept_rd_crx` and `intercept_wr_crx`: one bit per control register.
    pub struct CrIntercepts: u16 {
        const CR0 = 1 << 0;
        const CR2 = 1 << 2;
        const CR3 = 1 << 3;
        const CR4 = 1 << 4;
        const CR8 = 1 << 8;
    }

    /// `intercept_rd_drx` and `intercept_wr_drx`: one bit per debug register.
    pub struct DrIntercepts: u16 {
        const DR0 = 1 << 0;
        const DR1 = 1 << 1;
        const DR2 = 1 << 2;
        const DR3 = 1 << 3;
        const DR4 = 1 << 4;
        const DR5 = 1 << 5;
        const DR6 = 1 << 6;
        const DR7 = 1 << 7;
    }

    /// `intercept_exceptions`: one bit per exception vector.
    pub struct ExceptionIntercepts: u32 {
        const DIVIDE_ERROR = 1 << 0;
        const DEBUG = 1 << 1;
        const NMI = 1 << 2;
        const BREAKPOINT = 1 << 3;
        const OVERFLOW = 1 << 4;
        const BOUND_RANGE = 1 << 5;
        const INVALID_OPCODE = 1 << 6;
        const DEVICE_NOT_AVAILABLE = 1 << 7;
        const DOUBLE_FAULT = 1 << 8;
        const INVALID_TSS = 1 << 10;
        const SEGMENT_NOT_PRESENT = 1 << 11;
        const STACK_FAULT = 1 << 12;
        const GENERAL_PROTECTION = 1 << 13;
        const PAGE_FAULT = 1 << 14;
        const X87_FLOATING_POINT = 1 << 16;
        const ALIGNMENT_CHECK = 1 << 17;
        const MACHINE_CHECK = 1 << 18;
        const SIMD_FLOATING_POINT = 1 << 19;
        const VMM_COMMUNICATION = 1 << 29;
        const SECURITY = 1 << 30;
    }

    /// `intercept_instruction0` (offset 0x00c).
    pub struct InterceptInstruction0: u32 {
        const INTR = 1 << 0;
        const NMI = 1 << 1;
        const SMI = 1 << 2;
        const INIT = 1 << 3;
        const VINTR = 1 << 4;
        /// Writes to CR0 that change bits other than CR0.TS or CR0.MP.
        const CR0_SELECTIVE_WRITE = 1 << 5;

        const READ_IDTR = 1 << 6;
        const READ_GDTR = 1 << 7;
        const READ_LDTR = 1 << 8;
        const READ_TR = 1 << 9;

        const WRITE_IDTR = 1 << 10;
        const WRITE_GDTR = 1 << 11;
        const WRITE_LDTR = 1 << 12;
        const WRITE_TR = 1 << 13;

        const RDTSC = 1 << 14;
        const RDPMC = 1 << 15;
        const PUSHF = 1 << 16;
        const POPF = 1 << 17;
        const CPUID = 1 << 18;
        const RSM = 1 << 19;
        const IRET = 1 << 20;
        const INTN = 1 << 21;
        const INVD = 1 << 22;
        const PAUSE = 1 << 23;
        const HLT = 1 << 24;
        const INVLPG = 1 << 25;
        const INVLPGA = 1 << 26;
        /// Use the I/O permission map at `iopm_base_pa`.
        const IOIO_PROT = 1 << 27;
        /// Use the MSR permission map at `msrpm_base_pa`.
        const MSR_PROT = 1 << 28;
        const TASK_SWITCH = 1 << 29;
        const FERR_FREEZE = 1 << 30;
        const SHUTDOWN = 1 << 31;
    }

    /// `intercept_instruction1` (offset 0x010).
    pub struct InterceptInstruction1: u32 {
        /// Must be set, `VMRUN` fails with `VMEXIT_INVALID` otherwise.
        const VMRUN = 1 << 0;
        const VMMCALL = 1 << 1;
        const VMLOAD = 1 << 2;
        const VMSAVE = 1 << 3;
        const STGI = 1 << 4;
        const CLGI = 1 << 5;
        const SKINIT = 1 << 6;
        const RDTSCP = 1 << 7;
        const ICEBP = 1 << 8;
        const WBINVD = 1 << 9;
        const MONITOR = 1 << 10;
        const MWAIT = 1 << 11;
        const MWAIT_CONDITIONAL = 1 << 12;
        const XSETBV = 1 << 13;
    }
}
