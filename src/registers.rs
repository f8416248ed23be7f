/// LoRa mode register map
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Fifo = 0x00,
    OpMode = 0x01,
    FrMsb = 0x06,
    FrMid = 0x07,
    FrLsb = 0x08,
    PaConfig = 0x09,
    FifoAddrPtr = 0x0D,
    FifoTxBaseAddr = 0x0E,
    FifoRxBaseAddr = 0x0F,
    FifoRxCurrentAddr = 0x10,
    IrqFlagsMask = 0x11,
    IrqFlags = 0x12,
    RxNbBytes = 0x13,
    PktSnrValue = 0x19,
    PktRssiValue = 0x1A,
    ModemConfig1 = 0x1D,
    ModemConfig2 = 0x1E,
    SymbTimeoutLsb = 0x1F,
    PreambleMsb = 0x20,
    PreambleLsb = 0x21,
    PayloadLength = 0x22,
    ModemConfig3 = 0x26,
    IfFreq2 = 0x2F,
    IfFreq1 = 0x30,
    DetectOptimize = 0x31,
    InvertIq = 0x33,
    SyncWord = 0x39,
    InvertIq2 = 0x3B,
    Version = 0x42,
}

impl Register {
    /// Address byte of a read access, MSB cleared
    pub const fn read(self) -> u8 {
        self as u8 & 0x7F
    }

    /// Address byte of a write access, MSB set
    pub const fn write(self) -> u8 {
        self as u8 | 0x80
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_direction_bit() {
        assert_eq!(Register::OpMode.write(), 0x81);
        assert_eq!(Register::OpMode.read(), 0x01);
        assert_eq!(Register::Fifo.write(), 0x80);
        assert_eq!(Register::InvertIq2.read(), 0x3B);
        assert_eq!(Register::InvertIq2.write(), 0xBB);
    }
}
