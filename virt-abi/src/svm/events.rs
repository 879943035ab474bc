use crate::svm::Vmcb;
use bitfield::bitfield;

/// Value of the `TYPE` field of [`EventInjection`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// External or virtual interrupt (INTR).
    External = 0,
    Nmi = 2,
    /// Exception (fault or trap).
    Exception = 3,
    /// Software interrupt (INTn instruction).
    Software = 4,
}

impl EventType {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::External),
            2 => Some(Self::Nmi),
            3 => Some(Self::Exception),
            4 => Some(Self::Software),
            _ => None,
        }
    }
}

bitfield! {
    /// See `15.20 Event Injection`.
    ///
    /// The VMM can inject exceptions or interrupts (collectively referred to as events) into the guest by
    /// setting bits in the VMCB's EVENTINJ field prior to executing the VMRUN instruction
    ///
    /// When an event is injected by means of this mechanism, the VMRUN instruction causes the guest to take the
    /// specified exception or interrupt unconditionally before executing the first guest instruction.
    ///
    /// The processor reports an event whose delivery was interrupted by a #VMEXIT in EXITINTINFO
    /// using the same format.
    ///
    /// ## Fields
    ///
    /// - `Vector`: The 8-bit IDT vector of the interrupt or exception. If `TYPE` is 2 (NMI), the `VECTOR` field is ignored.
    /// - `Type`: Qualifies the guest exception or interrupt to generate, see [`EventType`].
    /// - `Error Code Valid` (`EV`): Set to 1 if the exception should push an error code onto the stack; clear to 0 otherwise.
    /// - `Valid`: Set to 1 if an event is to be inject into the guest; clear to 0 otherwise.
    /// - `Error Code`: If `EV` is set to 1, the error code to be pushed onto the stack, ignored otherwise.
    ///
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct EventInjection(u64);
    impl Debug;
    pub u8, vector, set_vector: 7, 0;                   // [0-7]
    pub u8, raw_type, set_raw_type: 10, 8;              // [8-10]
    pub error_code_valid, set_error_code_valid: 11;     // [11]
    // Reserved                                         // [12-30]
    pub valid, set_valid: 31;                           // [31]
    pub u32, error_code, set_error_code: 63, 32;        // [32-63]
}

impl From<u64> for EventInjection {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<EventInjection> for u64 {
    fn from(value: EventInjection) -> Self {
        value.0
    }
}

impl EventInjection {
    fn with(event_type: EventType, vector: u8) -> Self {
        let mut event = EventInjection(0);
        event.set_vector(vector);
        event.set_raw_type(event_type as u8);
        event.set_valid(true);

        event
    }

    pub fn external(vector: u8) -> Self {
        Self::with(EventType::External, vector)
    }

    pub fn nmi() -> Self {
        Self::with(EventType::Nmi, 2)
    }

    /// Exception with an optional error code. Only #DF, #TS, #NP, #SS, #GP, #PF, #AC
    /// and #CP push one.
    pub fn exception(vector: u8, error_code: Option<u32>) -> Self {
        let mut event = Self::with(EventType::Exception, vector);
        if let Some(error_code) = error_code {
            event.set_error_code_valid(true);
            event.set_error_code(error_code);
        }

        event
    }

    pub fn software(vector: u8) -> Self {
        Self::with(EventType::Software, vector)
    }

    /// See `8 Exceptions and Interrupts > 8.2 Vectors > 8.2.14 #GP`.
    pub fn gp() -> Self {
        Self::exception(13, Some(0))
    }

    pub fn bp() -> Self {
        Self::exception(3, None)
    }

    /// `None` for the reserved type encodings 1, 5, 6 and 7.
    pub fn event_type(&self) -> Option<EventType> {
        EventType::from_raw(self.raw_type())
    }

    /// Decodes the event that was being delivered when the last #VMEXIT happened, if any.
    pub fn pending(vmcb: &Vmcb) -> Option<Self> {
        let event = EventInjection(vmcb.control_area.exitintinfo);
        event.valid().then_some(event)
    }

    /// Injects the current event into the guest vmcb.
    pub fn inject(&self, vmcb: &mut Vmcb) {
        log::trace!("Injecting {:?}", self);
        vmcb.control_area.eventinj = self.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gp() {
        let event = EventInjection::gp();
        assert_eq!(event.0, 0x8000_0b0d);
        assert_eq!(event.vector(), 13);
        assert_eq!(event.event_type(), Some(EventType::Exception));
        assert!(event.error_code_valid());
        assert_eq!(event.error_code(), 0);
    }

    #[test]
    fn test_bp() {
        let event = EventInjection::bp();
        assert_eq!(event.0, 0x8000_0303);
        assert!(!event.error_code_valid());
    }

    #[test]
    fn test_page_fault_error_code() {
        let event = EventInjection::exception(14, Some(0b10));
        assert_eq!(event.0, 0x0000_0002_8000_0b0e);
        assert_eq!(event.error_code(), 2);
    }

    #[test]
    fn test_other_types() {
        assert_eq!(EventInjection::external(0x20).0, 0x8000_0020);
        assert_eq!(EventInjection::nmi().event_type(), Some(EventType::Nmi));
        assert_eq!(EventInjection::software(0x80).0, 0x8000_0480);

        let mut event = EventInjection::external(0x20);
        event.set_raw_type(5);
        assert_eq!(event.event_type(), None);
    }

    #[test]
    fn test_inject() {
        let mut vmcb = Vmcb::new_zeroed();
        EventInjection::gp().inject(&mut vmcb);

        assert_eq!(vmcb.control_area.eventinj, 0x8000_0b0d);
        assert_eq!(&vmcb.as_bytes()[0xa8..0xb0], &[0x0d, 0x0b, 0x00, 0x80, 0, 0, 0, 0]);
    }

    #[test]
    fn test_pending() {
        let mut vmcb = Vmcb::new_zeroed();
        assert_eq!(EventInjection::pending(&vmcb), None);

        vmcb.control_area.exitintinfo = EventInjection::exception(14, Some(3)).into();
        let event = EventInjection::pending(&vmcb).unwrap();
        assert_eq!(event.vector(), 14);
        assert_eq!(event.error_code(), 3);
    }
}
