//! Frequency and data rate tables.
//!
//! Both tables are flat byte arrays of 3-byte entries owned by the caller. A frequency entry holds
//! the `FrMsb`, `FrMid`, `FrLsb` register values; a data rate entry holds the `ModemConfig2`,
//! `ModemConfig1`, `ModemConfig3` register values. Entries can be written by hand or built with
//! [`Frequency`](crate::config::Frequency) and [`DataRate`](crate::config::lora::DataRate).

/// Size of one table entry
pub const ENTRY_LEN: usize = 3;

/// EU868 channels, 61.035 Hz synthesizer step
pub static EU868_FREQUENCIES: [u8; 24] = [
    0xD9, 0x06, 0x8B, // 868.100 MHz
    0xD9, 0x13, 0x58, // 868.300 MHz
    0xD9, 0x20, 0x24, // 868.500 MHz
    0xD8, 0xC6, 0x8B, // 867.100 MHz
    0xD8, 0xD3, 0x58, // 867.300 MHz
    0xD8, 0xE0, 0x24, // 867.500 MHz
    0xD8, 0xEC, 0xF1, // 867.700 MHz
    0xD8, 0xF9, 0xBE, // 867.900 MHz
];

/// SF7 to SF12 at 125 kHz, coding rate 4/5, CRC on
pub static BW125_DATA_RATES: [u8; 18] = [
    0x74, 0x72, 0x04, // SF7BW125
    0x84, 0x72, 0x04, // SF8BW125
    0x94, 0x72, 0x04, // SF9BW125
    0xA4, 0x72, 0x04, // SF10BW125
    0xB4, 0x72, 0x0C, // SF11BW125
    0xC4, 0x72, 0x0C, // SF12BW125
];

pub const CH_868_100: u8 = 0;
pub const CH_868_300: u8 = 1;
pub const CH_868_500: u8 = 2;
pub const CH_867_100: u8 = 3;
pub const CH_867_300: u8 = 4;
pub const CH_867_500: u8 = 5;
pub const CH_867_700: u8 = 6;
pub const CH_867_900: u8 = 7;

pub const SF7_BW125: u8 = 0;
pub const SF8_BW125: u8 = 1;
pub const SF9_BW125: u8 = 2;
pub const SF10_BW125: u8 = 3;
pub const SF11_BW125: u8 = 4;
pub const SF12_BW125: u8 = 5;

/// Installed tables and the currently selected entries
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelTables<'a> {
    frequencies: Option<&'a [u8]>,
    data_rates: Option<&'a [u8]>,
    frequency: Option<&'a [u8; ENTRY_LEN]>,
    data_rate: Option<&'a [u8; ENTRY_LEN]>,
}

impl<'a> ChannelTables<'a> {
    pub const fn new() -> Self {
        Self {
            frequencies: None,
            data_rates: None,
            frequency: None,
            data_rate: None,
        }
    }

    /// Replace both tables. The current selection keeps pointing into the previous tables until
    /// the next [`select`](Self::select).
    pub fn install(&mut self, frequencies: &'a [u8], data_rates: &'a [u8]) {
        self.frequencies = Some(frequencies);
        self.data_rates = Some(data_rates);
    }

    pub fn is_installed(&self) -> bool {
        self.frequencies.is_some() && self.data_rates.is_some()
    }

    /// Select entries by index. An index past the end of its table leaves that entry unset.
    pub fn select(&mut self, frequency: u8, data_rate: u8) {
        self.frequency = self.frequencies.and_then(|table| entry(table, frequency));
        self.data_rate = self.data_rates.and_then(|table| entry(table, data_rate));
        if self.is_installed() && self.current().is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("channel ({}, {}) is out of table bounds", frequency, data_rate);
        }
    }

    /// Currently selected frequency and data rate entries
    pub fn current(&self) -> Option<(&'a [u8; ENTRY_LEN], &'a [u8; ENTRY_LEN])> {
        Some((self.frequency?, self.data_rate?))
    }

    /// Currently selected entries, falling back to the first entry of each table when unset
    pub fn current_or_first(&mut self) -> Option<(&'a [u8; ENTRY_LEN], &'a [u8; ENTRY_LEN])> {
        if self.current().is_none() {
            self.select(0, 0);
        }
        self.current()
    }
}

fn entry(table: &[u8], index: u8) -> Option<&[u8; ENTRY_LEN]> {
    let base = index as usize * ENTRY_LEN;
    table.get(base..base + ENTRY_LEN)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_entry_offsets() {
        let mut tables = ChannelTables::new();
        tables.install(&EU868_FREQUENCIES, &BW125_DATA_RATES);
        for freq in CH_868_100..=CH_867_900 {
            for rate in SF7_BW125..=SF12_BW125 {
                tables.select(freq, rate);
                let (f, r) = tables.current().unwrap();
                let f_base = freq as usize * 3;
                let r_base = rate as usize * 3;
                assert_eq!(f[..], EU868_FREQUENCIES[f_base..f_base + 3]);
                assert_eq!(r[..], BW125_DATA_RATES[r_base..r_base + 3]);
            }
        }
    }

    #[test]
    fn borrows_caller_tables() {
        let freqs = [1, 2, 3, 4, 5, 6];
        let rates = [7, 8, 9];
        let mut tables = ChannelTables::new();
        tables.install(&freqs, &rates);
        tables.select(1, 0);
        let (f, r) = tables.current().unwrap();
        assert!(core::ptr::eq(f.as_ptr(), &freqs[3]));
        assert!(core::ptr::eq(r.as_ptr(), &rates[0]));
    }

    #[test]
    fn unset_without_tables() {
        let mut tables = ChannelTables::new();
        assert!(!tables.is_installed());
        tables.select(0, 0);
        assert_eq!(tables.current(), None);
        assert_eq!(tables.current_or_first(), None);
    }

    #[test]
    fn out_of_bounds_falls_back_to_first() {
        let mut tables = ChannelTables::new();
        tables.install(&EU868_FREQUENCIES, &BW125_DATA_RATES);
        tables.select(CH_867_900, 6);
        assert_eq!(tables.current(), None);
        let (f, r) = tables.current_or_first().unwrap();
        assert_eq!(f[..], EU868_FREQUENCIES[0..3]);
        assert_eq!(r[..], BW125_DATA_RATES[0..3]);
    }

    #[test]
    fn partial_trailing_entry_is_rejected() {
        let freqs = [0xD9, 0x06, 0x8B, 0xD9];
        let mut tables = ChannelTables::new();
        tables.install(&freqs, &BW125_DATA_RATES);
        tables.select(1, 0);
        assert_eq!(tables.current(), None);
    }
}
