/// Half-duplex packet radio with table driven channel selection.
///
/// Frequency and data rate tables are borrowed for `'a` and addressed by index, see
/// [`tables`](crate::tables) for the entry layout.
pub trait Radio<'a> {
    type Error;

    /// Bring the radio to a configured sleep state. Also used to recover from stalls.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Transmit a packet and wait for completion. Transmission failures are not reported.
    fn send(&mut self, packet: &[u8]) -> Result<(), Self::Error>;

    /// Receive a packet into `buffer`, returning the number of bytes written.
    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Select the frequency and data rate table entries used by the next operations
    fn set_channel(&mut self, frequency: u8, data_rate: u8);

    /// Install frequency and data rate tables
    fn set_tables(&mut self, frequencies: &'a [u8], data_rates: &'a [u8]);

    /// Signal to noise ratio of the last received packet, in dB
    fn last_snr(&self) -> i8;
}
