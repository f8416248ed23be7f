pub mod lora;

/// Radio mode
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// FSK/OOK sleep, the rest state between operations
    #[default]
    Sleep = 0x00,
    LoRaSleep = 0x80,
    Standby = 0x81,
    Tx = 0x83,
    /// Single reception, bounded by the symbol timeout
    RxSingle = 0x86,
}

/// Configuration parameters
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub sync_word: u8,
    pub preamble_length: u16,
    pub rx_symbol_timeout: u8,
    pub tx_iq: IqPolarity,
    pub rx_iq: IqPolarity,
    /// Drop payloads and receive buffers larger than the FIFO partition
    pub safety_checks: bool,
    pub settle_delay_ms: u32,
    pub poll_interval_ms: u32,
    /// Time after which a pending operation is considered stalled and the radio is reinitialized
    pub stall_timeout_ms: u32,
    /// Upper bound on the completion wait
    pub operation_timeout_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync_word: 0x34,
            preamble_length: 8,
            rx_symbol_timeout: 255,
            tx_iq: Default::default(),
            rx_iq: Default::default(),
            safety_checks: true,
            settle_delay_ms: 10,
            poll_interval_ms: 8,
            stall_timeout_ms: 12_000,
            operation_timeout_ms: 16_000,
        }
    }
}

/// I/Q polarity
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IqPolarity {
    #[default]
    Normal,
    Inverted,
}

impl IqPolarity {
    /// Values of the `InvertIq` and `InvertIq2` registers
    pub(crate) fn as_bytes(&self) -> [u8; 2] {
        match self {
            IqPolarity::Normal => [0x27, 0x1D],
            IqPolarity::Inverted => [0x66, 0x19],
        }
    }
}

/// Carrier frequency as a synthesizer register triplet
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Frequency {
    raw: [u8; 3],
}

impl Frequency {
    /// Frequency step is 32 MHz / 2^19
    pub const fn new(freq: u32) -> Self {
        let val = ((freq as u64) << 19) / 32_000_000;
        let val = val as u32;
        Self {
            raw: [(val >> 16) as u8, (val >> 8) as u8, val as u8],
        }
    }

    pub const fn from_bytes(raw: [u8; 3]) -> Self {
        Self { raw }
    }

    pub fn as_bytes(&self) -> [u8; 3] {
        self.raw
    }

    /// Carrier frequency in Hz
    pub fn hz(&self) -> u32 {
        let val = (self.raw[0] as u64) << 16 | (self.raw[1] as u64) << 8 | self.raw[2] as u64;
        ((val * 32_000_000) >> 19) as u32
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::new(868_100_000)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frequency {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Frequency {{ {:02x} }}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_triplet() {
        assert_eq!(Frequency::new(868_000_000).as_bytes(), [0xD9, 0x00, 0x00]);
        assert_eq!(Frequency::new(915_000_000).as_bytes(), [0xE4, 0xC0, 0x00]);
        assert_eq!(Frequency::from_bytes([0xD9, 0x00, 0x00]).hz(), 868_000_000);
    }

    #[test]
    fn iq_registers() {
        assert_eq!(IqPolarity::default().as_bytes(), [0x27, 0x1D]);
        assert_eq!(IqPolarity::Inverted.as_bytes(), [0x66, 0x19]);
    }

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.sync_word, 0x34);
        assert_eq!(cfg.preamble_length, 8);
        assert_eq!(cfg.rx_symbol_timeout, 255);
        assert!(cfg.safety_checks);
        assert!(cfg.stall_timeout_ms < cfg.operation_timeout_ms);
    }
}
