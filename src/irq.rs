use bitflags::bitflags;

bitflags! {
    /// Interrupts
    #[derive(Copy, Clone, Default, PartialEq, Debug)]
    pub struct Irq: u8 {
        const CadDetected = 1;
        const FhssChangeChannel = (1 << 1);
        const CadDone = (1 << 2);
        const TxDone = (1 << 3);
        const ValidHeader = (1 << 4);
        const PayloadCrcError = (1 << 5);
        const RxDone = (1 << 6);
        const RxTimeout = (1 << 7);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Irq {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Irq {{ 0b{0=0..8:08b} }}", self.bits())
    }
}

/// Final state of a reception, decoded from the interrupt flags
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxStatus {
    Done,
    CrcError,
    Timeout,
    Unknown,
}

impl From<Irq> for RxStatus {
    fn from(flags: Irq) -> Self {
        let timeout = flags.contains(Irq::RxTimeout);
        let done = flags.contains(Irq::RxDone);
        match (timeout, done) {
            (true, false) => RxStatus::Timeout,
            (false, true) if flags.contains(Irq::PayloadCrcError) => RxStatus::CrcError,
            (false, true) => RxStatus::Done,
            _ => RxStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_status_decode() {
        let decode = |raw: u8| RxStatus::from(Irq::from_bits_truncate(raw));
        assert_eq!(decode(0x40), RxStatus::Done);
        assert_eq!(decode(0x50), RxStatus::Done);
        assert_eq!(decode(0x60), RxStatus::CrcError);
        assert_eq!(decode(0x80), RxStatus::Timeout);
        assert_eq!(decode(0xA0), RxStatus::Timeout);
        assert_eq!(decode(0xE0), RxStatus::Unknown);
        assert_eq!(decode(0xC0), RxStatus::Unknown);
        assert_eq!(decode(0x00), RxStatus::Unknown);
        assert_eq!(decode(0x20), RxStatus::Unknown);
    }
}
