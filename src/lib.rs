//! A platform agnostic Rust driver for the RFM95 (SX1276) LoRa transceiver, based on the `embedded-hal` traits.
//!
//! The driver talks to the radio over register accesses, one SPI transaction per register. Carrier
//! frequency and modulation are not configured directly: the caller installs a frequency table and
//! a data rate table (see [`tables`]) and selects entries by index. Transmission and reception are
//! blocking and poll the interrupt flags until completion, reinitializing the radio when an
//! operation stalls.
//!
//! ```ignore
//! let mut radio = Rfm95::try_new(spi, delay, clock, Config::default())?;
//! radio.set_tables(&EU868_FREQUENCIES, &BW125_DATA_RATES);
//! radio.set_channel(CH_868_100, SF7_BW125);
//! radio.send(b"ping")?;
//!
//! let mut buffer = [0; MAX_PAYLOAD_LEN];
//! match radio.receive(&mut buffer) {
//!     Ok(len) => handle(&buffer[..len], radio.last_snr()),
//!     Err(err) => log(err.code()),
//! }
//! ```
#![cfg_attr(not(test), no_std)]

use clock::Clock;
use config::*;
use embedded_hal::{
    delay::DelayNs,
    spi::{self, Operation},
};
use irq::*;
use registers::Register;
use tables::*;

pub mod clock;
pub mod config;
pub mod irq;
pub mod radio;
pub mod registers;
pub mod tables;


pub use radio::Radio;

pub const RFM95_MODE: spi::Mode = embedded_hal::spi::MODE_0;

/// Largest payload fitting one half of the FIFO
pub const MAX_PAYLOAD_LEN: usize = 64;

/// Silicon revision reported by the `Version` register
pub const SILICON_VERSION: u8 = 0x12;

const FIFO_TX_BASE_ADDR: u8 = 0x80;
const FIFO_RX_BASE_ADDR: u8 = 0x00;
const FIFO_SIZE: usize = 256;
const PA_MAX_POWER: u8 = 0xFF;
const RSSI_OFFSET_HF: i16 = -157;

/// RFM95 error
pub enum Error<SPI: spi::SpiDevice> {
    Timeout,
    CrcError,
    Unknown,
    TransferError(SPI::Error),
}

impl<SPI: spi::SpiDevice> Error<SPI> {
    /// Numeric error code: -1 timeout, -2 CRC error, -3 anything else
    pub fn code(&self) -> i8 {
        match self {
            Self::Timeout => -1,
            Self::CrcError => -2,
            Self::Unknown | Self::TransferError(_) => -3,
        }
    }
}

impl<SPI: spi::SpiDevice> core::fmt::Debug for Error<SPI> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "Timeout"),
            Self::CrcError => write!(f, "CRC Error"),
            Self::Unknown => write!(f, "Unknown"),
            Self::TransferError(err) => write!(f, "SPI Error: {:?}", err),
        }
    }
}

/// Outcome of waiting for an interrupt flag
#[derive(Copy, Clone, PartialEq, Debug)]
enum Completion {
    Raised(Irq),
    /// No flag within the stall timeout, the radio has been reinitialized
    Stalled,
    /// No flag within the operation timeout
    Expired(Irq),
}

/// Driver for the RFM95
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rfm95<'a, SPI, DELAY, CLOCK> {
    spi: SPI,
    delay: DELAY,
    clock: CLOCK,
    cfg: Config,
    tables: ChannelTables<'a>,
    last_snr: i8,
    last_rssi: i16,
}

impl<'a, SPI, DELAY, CLOCK> Rfm95<'a, SPI, DELAY, CLOCK>
where
    SPI: spi::SpiDevice,
    DELAY: DelayNs,
    CLOCK: Clock,
{
    /// Create a new RFM95 driver without touching the radio
    pub fn new(spi: SPI, delay: DELAY, clock: CLOCK, cfg: Config) -> Self {
        Rfm95 {
            spi,
            delay,
            clock,
            cfg,
            tables: ChannelTables::new(),
            last_snr: 0,
            last_rssi: 0,
        }
    }

    /// Create a new RFM95 driver and initialize the radio
    pub fn try_new(
        spi: SPI,
        delay: DELAY,
        clock: CLOCK,
        cfg: Config,
    ) -> Result<Self, Error<SPI>> {
        let mut radio = Self::new(spi, delay, clock, cfg);
        radio.init()?;
        Ok(radio)
    }

    /// Realeses SPI device, delay and clock
    pub fn release(self) -> (SPI, DELAY, CLOCK) {
        (self.spi, self.delay, self.clock)
    }

    /// Configure the LoRa modem and leave the radio sleeping.
    ///
    /// Installs the EU868 and BW125 default tables when none are installed and selects the first
    /// entries when no channel is selected.
    pub fn init(&mut self) -> Result<(), Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("init()");
        self.set_mode(Mode::Sleep)?;
        self.set_mode(Mode::LoRaSleep)?;
        self.set_mode(Mode::Standby)?;
        self.delay.delay_ms(self.cfg.settle_delay_ms);

        self.write_register(Register::PaConfig, PA_MAX_POWER)?;
        let preamble = self.cfg.preamble_length.to_be_bytes();
        self.write_register(Register::PreambleMsb, preamble[0])?;
        self.write_register(Register::PreambleLsb, preamble[1])?;
        self.write_register(Register::SyncWord, self.cfg.sync_word)?;

        // Errata 2.3, receiver spurious reception of a LoRa signal
        let detect_optimize = self.read_register(Register::DetectOptimize)?;
        self.write_register(Register::DetectOptimize, (detect_optimize & 0x78) | 0x03)?;
        self.write_register(Register::IfFreq1, 0x00)?;
        self.write_register(Register::IfFreq2, 0x40)?;

        self.write_register(Register::FifoTxBaseAddr, FIFO_TX_BASE_ADDR)?;
        self.write_register(Register::FifoRxBaseAddr, FIFO_RX_BASE_ADDR)?;
        self.set_mode(Mode::Sleep)?;

        if !self.tables.is_installed() {
            self.tables.install(&EU868_FREQUENCIES, &BW125_DATA_RATES);
        }
        self.tables.current_or_first();
        Ok(())
    }

    /// Install frequency and data rate tables
    pub fn set_tables(&mut self, frequencies: &'a [u8], data_rates: &'a [u8]) {
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "set_tables({} bytes, {} bytes)",
            frequencies.len(),
            data_rates.len()
        );
        self.tables.install(frequencies, data_rates);
    }

    /// Select frequency and data rate table entries
    pub fn set_channel(&mut self, frequency: u8, data_rate: u8) {
        #[cfg(feature = "defmt")]
        defmt::trace!("set_channel({}, {})", frequency, data_rate);
        self.tables.select(frequency, data_rate);
    }

    /// Get installed tables and current selection
    pub fn tables(&self) -> &ChannelTables<'a> {
        &self.tables
    }

    /// Set common config
    pub fn set_config(&mut self, cfg: Config) {
        #[cfg(feature = "defmt")]
        defmt::trace!("set_config({})", cfg);
        self.cfg = cfg;
    }

    /// Get common config
    pub fn get_config(&self) -> Config {
        self.cfg
    }

    /// SNR of the last received packet in dB
    pub fn last_snr(&self) -> i8 {
        self.last_snr
    }

    /// RSSI of the last received packet in dBm
    pub fn last_rssi(&self) -> i16 {
        self.last_rssi
    }

    /// Get silicon revision
    pub fn version(&mut self) -> Result<u8, Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("version()");
        self.read_register(Register::Version)
    }

    /// Transmit a packet on the selected channel and wait for completion.
    ///
    /// Oversized packets (with safety checks on) and missing tables make this a no-op. A
    /// transmission that does not complete within the stall timeout reinitializes the radio. None of
    /// these outcomes are reported; only bus errors are.
    pub fn send(&mut self, packet: &[u8]) -> Result<(), Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("send({:02x})", packet);
        if self.cfg.safety_checks && packet.len() > MAX_PAYLOAD_LEN {
            return Ok(());
        }
        if packet.len() >= FIFO_SIZE {
            return Ok(());
        }
        let Some((frequency, data_rate)) = self.tables.current_or_first() else {
            return Ok(());
        };

        self.set_mode(Mode::Standby)?;
        self.delay.delay_ms(self.cfg.settle_delay_ms);
        self.configure_channel(frequency, data_rate)?;
        self.set_iq_polarity(self.cfg.tx_iq)?;
        self.write_register(Register::PayloadLength, packet.len() as u8)?;
        self.write_register(Register::FifoAddrPtr, FIFO_TX_BASE_ADDR)?;
        for byte in packet {
            self.write_register(Register::Fifo, *byte)?;
        }
        self.set_mode(Mode::Tx)?;

        self.wait_irq(Irq::TxDone)?;

        self.clear_irq_status()?;
        self.set_mode(Mode::Sleep)
    }

    /// Receive a packet on the selected channel.
    ///
    /// Returns the number of bytes copied into `buffer`; longer packets are truncated to the buffer
    /// length. Buffers larger than [`MAX_PAYLOAD_LEN`] (with safety checks on) and missing tables
    /// return `Ok(0)` without touching the radio.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("receive({})", buffer.len());
        if self.cfg.safety_checks && buffer.len() > MAX_PAYLOAD_LEN {
            return Ok(0);
        }
        let Some((frequency, data_rate)) = self.tables.current_or_first() else {
            return Ok(0);
        };

        self.set_mode(Mode::Standby)?;
        self.write_register(Register::FifoAddrPtr, FIFO_RX_BASE_ADDR)?;
        self.configure_channel(frequency, data_rate)?;
        self.set_iq_polarity(self.cfg.rx_iq)?;
        self.write_register(Register::SymbTimeoutLsb, self.cfg.rx_symbol_timeout)?;
        self.clear_irq_status()?;
        self.set_mode(Mode::RxSingle)?;

        let flags = match self.wait_irq(Irq::RxDone | Irq::RxTimeout)? {
            Completion::Raised(flags) | Completion::Expired(flags) => flags,
            Completion::Stalled => return Err(Error::Timeout),
        };

        let length = usize::from(self.read_register(Register::RxNbBytes)?).min(buffer.len());
        let current = self.read_register(Register::FifoRxCurrentAddr)?;
        self.write_register(Register::FifoAddrPtr, current)?;
        for byte in buffer[..length].iter_mut() {
            *byte = self.read_register(Register::Fifo)?;
        }

        self.last_snr = self.read_register(Register::PktSnrValue)? as i8 / 4;
        self.last_rssi = RSSI_OFFSET_HF + i16::from(self.read_register(Register::PktRssiValue)?);

        self.clear_irq_status()?;
        self.set_mode(Mode::Sleep)?;

        match RxStatus::from(flags) {
            RxStatus::Done => Ok(length),
            RxStatus::CrcError => Err(Error::CrcError),
            RxStatus::Timeout => Err(Error::Timeout),
            RxStatus::Unknown => Err(Error::Unknown),
        }
    }

    /// Set radio mode
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("set_mode({})", mode);
        self.write_register(Register::OpMode, mode as u8)
    }

    /// Get IRQ status
    pub fn get_irq_status(&mut self) -> Result<Irq, Error<SPI>> {
        let value = self.read_register(Register::IrqFlags)?;
        Ok(Irq::from_bits_truncate(value))
    }

    /// Clear all IRQ flags
    pub fn clear_irq_status(&mut self) -> Result<(), Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("clear_irq_status()");
        self.write_register(Register::IrqFlags, Irq::all().bits())
    }

    fn configure_channel(
        &mut self,
        frequency: &[u8; ENTRY_LEN],
        data_rate: &[u8; ENTRY_LEN],
    ) -> Result<(), Error<SPI>> {
        self.write_register(Register::FrMsb, frequency[0])?;
        self.write_register(Register::FrMid, frequency[1])?;
        self.write_register(Register::FrLsb, frequency[2])?;
        self.write_register(Register::ModemConfig2, data_rate[0])?;
        self.write_register(Register::ModemConfig1, data_rate[1])?;
        self.write_register(Register::ModemConfig3, data_rate[2])
    }

    fn set_iq_polarity(&mut self, polarity: IqPolarity) -> Result<(), Error<SPI>> {
        let [iq, iq2] = polarity.as_bytes();
        self.write_register(Register::InvertIq, iq)?;
        self.write_register(Register::InvertIq2, iq2)
    }

    fn wait_irq(&mut self, mask: Irq) -> Result<Completion, Error<SPI>> {
        let start = self.clock.now_ms();
        loop {
            let flags = self.get_irq_status()?;
            if flags.intersects(mask) {
                return Ok(Completion::Raised(flags));
            }
            let elapsed = self.clock.now_ms().saturating_sub(start);
            if elapsed >= u64::from(self.cfg.stall_timeout_ms) {
                #[cfg(feature = "defmt")]
                defmt::warn!("no {} after {} ms, reinitializing", mask, elapsed);
                self.init()?;
                return Ok(Completion::Stalled);
            }
            if elapsed >= u64::from(self.cfg.operation_timeout_ms) {
                return Ok(Completion::Expired(flags));
            }
            self.delay.delay_ms(self.cfg.poll_interval_ms);
        }
    }

    /// Write a single register
    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("write_register({}, {:02x})", reg, value);
        self.spi
            .write(&[reg.write(), value])
            .map_err(Error::<SPI>::TransferError)
    }

    /// Read a single register
    pub fn read_register(&mut self, reg: Register) -> Result<u8, Error<SPI>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("read_register({})", reg);
        let mut value = [0];
        self.spi
            .transaction(&mut [Operation::Write(&[reg.read()]), Operation::Read(&mut value)])
            .map_err(Error::<SPI>::TransferError)?;
        Ok(value[0])
    }
}

impl<'a, SPI, DELAY, CLOCK> Radio<'a> for Rfm95<'a, SPI, DELAY, CLOCK>
where
    SPI: spi::SpiDevice,
    DELAY: DelayNs,
    CLOCK: Clock,
{
    type Error = Error<SPI>;

    fn init(&mut self) -> Result<(), Self::Error> {
        Rfm95::init(self)
    }

    fn send(&mut self, packet: &[u8]) -> Result<(), Self::Error> {
        Rfm95::send(self, packet)
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        Rfm95::receive(self, buffer)
    }

    fn set_channel(&mut self, frequency: u8, data_rate: u8) {
        Rfm95::set_channel(self, frequency, data_rate)
    }

    fn set_tables(&mut self, frequencies: &'a [u8], data_rates: &'a [u8]) {
        Rfm95::set_tables(self, frequencies, data_rates)
    }

    fn last_snr(&self) -> i8 {
        Rfm95::last_snr(self)
    }
}
