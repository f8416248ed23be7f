/// LoRa spreading factor
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoRaSpreadingFactor {
    Sf6 = 0x60,
    #[default]
    Sf7 = 0x70,
    Sf8 = 0x80,
    Sf9 = 0x90,
    Sf10 = 0xA0,
    Sf11 = 0xB0,
    Sf12 = 0xC0,
}

/// LoRa bandwidth
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoRaBandwidth {
    Bw7_8kHz = 0x00,
    Bw10_4kHz = 0x10,
    Bw15_6kHz = 0x20,
    Bw20_8kHz = 0x30,
    Bw31_25kHz = 0x40,
    Bw41_7kHz = 0x50,
    Bw62_5kHz = 0x60,
    #[default]
    Bw125kHz = 0x70,
    Bw250kHz = 0x80,
    Bw500kHz = 0x90,
}

impl LoRaBandwidth {
    /// Bandwidth in kHz
    pub fn khz(&self) -> f32 {
        match self {
            LoRaBandwidth::Bw7_8kHz => 7.8,
            LoRaBandwidth::Bw10_4kHz => 10.4,
            LoRaBandwidth::Bw15_6kHz => 15.6,
            LoRaBandwidth::Bw20_8kHz => 20.8,
            LoRaBandwidth::Bw31_25kHz => 31.25,
            LoRaBandwidth::Bw41_7kHz => 41.7,
            LoRaBandwidth::Bw62_5kHz => 62.5,
            LoRaBandwidth::Bw125kHz => 125.0,
            LoRaBandwidth::Bw250kHz => 250.0,
            LoRaBandwidth::Bw500kHz => 500.0,
        }
    }
}

/// LoRa coding rate
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoRaCodingRate {
    #[default]
    Cr4_5 = 0x02,
    Cr4_6 = 0x04,
    Cr4_7 = 0x06,
    Cr4_8 = 0x08,
}

/// LoRa CRC mode
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoRaCrc {
    #[default]
    Enabled = 0x04,
    Disabled = 0x00,
}

/// Data rate table entry builder
#[derive(Copy, Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataRate {
    pub spreading_factor: LoRaSpreadingFactor,
    pub bandwidth: LoRaBandwidth,
    pub coding_rate: LoRaCodingRate,
    pub crc: LoRaCrc,
    /// Mandated when a symbol lasts longer than 16 ms
    pub low_data_rate_optimize: bool,
}

impl DataRate {
    const AGC_AUTO_ON: u8 = 0x04;
    const LOW_DATA_RATE_OPTIMIZE: u8 = 0x08;

    /// `ModemConfig2`, `ModemConfig1`, `ModemConfig3` register values, in table order
    pub fn as_bytes(&self) -> [u8; 3] {
        let ldro = if self.low_data_rate_optimize {
            Self::LOW_DATA_RATE_OPTIMIZE
        } else {
            0
        };
        [
            self.spreading_factor as u8 | self.crc as u8,
            self.bandwidth as u8 | self.coding_rate as u8,
            ldro | Self::AGC_AUTO_ON,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::BW125_DATA_RATES;

    #[test]
    fn default_is_sf7_bw125() {
        assert_eq!(DataRate::default().as_bytes(), BW125_DATA_RATES[0..3]);
    }

    #[test]
    fn sf12_needs_ldro() {
        let dr = DataRate {
            spreading_factor: LoRaSpreadingFactor::Sf12,
            low_data_rate_optimize: true,
            ..Default::default()
        };
        assert_eq!(dr.as_bytes(), BW125_DATA_RATES[15..18]);
    }

    #[test]
    fn implicit_fields() {
        let dr = DataRate {
            spreading_factor: LoRaSpreadingFactor::Sf9,
            bandwidth: LoRaBandwidth::Bw500kHz,
            coding_rate: LoRaCodingRate::Cr4_8,
            crc: LoRaCrc::Disabled,
            low_data_rate_optimize: false,
        };
        assert_eq!(dr.as_bytes(), [0x90, 0x98, 0x04]);
        assert_eq!(dr.bandwidth.khz(), 500.0);
    }
}
