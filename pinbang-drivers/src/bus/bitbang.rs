//! Bit-banged two-wire bus master
//!
//! Emulates an I2C-style master on two bits of a pin-word port. The port only
//! accepts whole-word writes, so the bus keeps the last word it wrote and
//! flips the clock/data bits in that copy before replaying it.
//!
//! # Line Discipline
//!
//! - "Set" a line = release it high, "clear" = drive it low
//! - Data changes only while the clock is low, except for start/stop
//! - Idle means both lines released, so a byte transfer needs an open
//!   transaction: from idle the first data change would be a start and the
//!   first clock pulse would be missing
//! - After raising the clock the master waits until the line actually reads
//!   high (clock stretching), bounded by [`BusTiming::clock_retries`]
//!
//! # Failure Policy
//!
//! Physical-layer problems have no software recovery:
//! - A stretched clock that never returns is logged and counted, then the
//!   transfer continues as if the line were high
//! - A data line that reads low after being released is logged as lost
//!   arbitration and counted, then the transfer continues
//! - A failed port read samples as 0
//! - A failed port write is logged and the bit sequence keeps going; the
//!   enclosing byte operation reports [`BusError::Transport`] at its end

use embedded_hal::delay::DelayNs;
use pinbang_hal::{GpioPort, PinMap, PinWord};

use super::{Ack, BusConfig, BusError, BusState, BusTiming, ByteWrite};

/// Software two-wire bus master bound to one device address
///
/// The bus borrows the port for its whole lifetime; the port must outlive it
/// and nothing else may write to the port in the meantime.
pub struct BitBangBus<'a, P: GpioPort, D: DelayNs> {
    port: &'a mut P,
    delay: D,
    pins: PinMap,
    timing: BusTiming,
    address: u8,
    /// Last word written to the port
    word: PinWord,
    state: BusState,
    /// Set on any arbitration loss, never cleared
    lost: bool,
    /// A port write failed since the current byte operation began
    fault: bool,
    clock_timeouts: u32,
    arbitration_losses: u32,
}

impl<'a, P: GpioPort, D: DelayNs> BitBangBus<'a, P, D> {
    /// Bind a bus to an open port and a 7-bit device address
    ///
    /// Releases both lines. Fails with [`BusError::InvalidPins`] if the pin
    /// map does not name two distinct single bits, with
    /// [`BusError::PortClosed`] if the port is not open and with
    /// [`BusError::Transport`] if the idle word could not be written.
    pub fn new(
        port: &'a mut P,
        address: u8,
        delay: D,
        config: BusConfig,
    ) -> Result<Self, BusError> {
        if !config.pins.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("bus: invalid pin map {}", config.pins);
            return Err(BusError::InvalidPins);
        }

        if !port.is_open() {
            #[cfg(feature = "defmt")]
            defmt::error!("bus: port is not open");
            return Err(BusError::PortClosed);
        }

        let mut bus = Self {
            port,
            delay,
            pins: config.pins,
            timing: config.timing,
            address: address & 0x7F,
            word: config.pins.both(),
            state: BusState::Idle,
            lost: false,
            fault: false,
            clock_timeouts: 0,
            arbitration_losses: 0,
        };

        bus.drive();
        bus.finish(())?;

        #[cfg(feature = "defmt")]
        defmt::debug!("bus: bound to address {=u8:#x}", bus.address);

        Ok(bus)
    }

    /// Release both lines and give the port back
    pub fn release(mut self) {
        self.word = self.pins.both();
        self.drive();
        self.state = BusState::Idle;
    }

    /// 7-bit device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current start/stop state
    pub fn state(&self) -> BusState {
        self.state
    }

    /// Whether arbitration was ever lost on this bus
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Number of clock-stretch waits that ran out of retries
    pub fn clock_timeouts(&self) -> u32 {
        self.clock_timeouts
    }

    /// Number of arbitration losses detected
    pub fn arbitration_losses(&self) -> u32 {
        self.arbitration_losses
    }

    /// Open a transaction, or re-open it if one is already started
    pub fn start_condition(&mut self) {
        if self.state == BusState::Started {
            // Repeated start: bring both lines back up first
            self.set_data();
            self.bit_delay();
            self.set_clock();
            self.wait_clock();
            self.bit_delay();
        }

        if !self.sample(self.pins.data) {
            self.arbitration_lost();
        }

        // Data falls while clock is high
        self.clear_data();
        self.bit_delay();
        self.clear_clock();

        self.state = BusState::Started;
    }

    /// Close the current transaction
    pub fn stop_condition(&mut self) {
        self.set_clock();
        self.wait_clock();
        self.bit_delay();

        // Data rises while clock is high
        self.set_data();
        self.bit_delay();

        if !self.sample(self.pins.data) {
            self.arbitration_lost();
        }

        self.state = BusState::Idle;
    }

    /// Clock out one bit
    ///
    /// Expects the clock low, as left by a start condition or a previous bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.set_data();
        } else {
            self.clear_data();
        }

        self.bit_delay();
        self.set_clock();
        self.bit_delay();
        self.clear_clock();
    }

    /// Clock in one bit
    ///
    /// Expects the clock low, as left by a start condition or a previous bit.
    pub fn read_bit(&mut self) -> bool {
        self.set_data();
        self.bit_delay();
        self.set_clock();

        self.wait_clock();
        self.bit_delay();

        let bit = self.sample(self.pins.data);
        self.clear_clock();
        bit
    }

    /// Write one byte
    ///
    /// With `send_start` the transaction is opened first and the address is
    /// sent MSB-first with the write bit (0), followed by its acknowledge
    /// slot. `data` then goes out MSB-first followed by its acknowledge slot.
    /// With `send_stop` the transaction is closed afterwards.
    ///
    /// Without `send_start` the bus must already be [`BusState::Started`];
    /// from idle nothing is sent and [`BusError::NotStarted`] is returned.
    ///
    /// Returns the acknowledge sampled after `data`. The whole sequence is
    /// always clocked out; a failed pin write anywhere in it is reported as
    /// [`BusError::Transport`] once the sequence is done.
    pub fn write_byte(
        &mut self,
        send_start: bool,
        send_stop: bool,
        data: u8,
    ) -> Result<Ack, BusError> {
        if !send_start {
            self.require_started()?;
        }
        self.fault = false;

        if send_start {
            self.start_condition();
            self.bit_delay();

            self.shift_out(self.address << 1);
            let _address_ack = Ack::from_level(self.read_bit());

            #[cfg(feature = "defmt")]
            if !_address_ack.is_ack() {
                defmt::debug!("bus: address {=u8:#x} not acknowledged", self.address);
            }
        }

        self.shift_out(data);
        let ack = Ack::from_level(self.read_bit());

        if send_stop {
            self.stop_condition();
        }

        self.finish(ack)
    }

    /// Read one byte MSB-first, then answer it with `ack`
    ///
    /// Send [`Ack::Nack`] for the last byte of a read. Needs an open
    /// transaction, like [`write_byte`](Self::write_byte) without a start.
    pub fn read_byte(&mut self, ack: Ack, send_stop: bool) -> Result<u8, BusError> {
        self.require_started()?;
        self.fault = false;

        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit() as u8;
        }

        self.write_bit(ack.level());

        if send_stop {
            self.stop_condition();
        }

        self.finish(byte)
    }

    fn require_started(&self) -> Result<(), BusError> {
        if self.state == BusState::Started {
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("bus: byte transfer outside a transaction");
            Err(BusError::NotStarted)
        }
    }

    /// Send eight bits MSB-first
    fn shift_out(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            self.write_bit(byte & (1 << bit) != 0);
        }
    }

    /// Poll until the clock reads high or the retry budget is spent
    fn wait_clock(&mut self) {
        for _ in 0..self.timing.clock_retries {
            if self.sample(self.pins.clock) {
                return;
            }
            self.delay.delay_us(self.timing.poll_delay_us);
        }

        self.clock_timeouts = self.clock_timeouts.saturating_add(1);

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "bus: clock still low after {=u16} polls",
            self.timing.clock_retries
        );
    }

    fn arbitration_lost(&mut self) {
        self.lost = true;
        self.arbitration_losses = self.arbitration_losses.saturating_add(1);

        #[cfg(feature = "defmt")]
        defmt::warn!("bus: arbitration lost");
    }

    fn set_data(&mut self) {
        self.word |= self.pins.data;
        self.drive();
    }

    fn clear_data(&mut self) {
        self.word &= !self.pins.data;
        self.drive();
    }

    fn set_clock(&mut self) {
        self.word |= self.pins.clock;
        self.drive();
    }

    fn clear_clock(&mut self) {
        self.word &= !self.pins.clock;
        self.drive();
    }

    /// Replay the tracked word onto the port
    fn drive(&mut self) {
        if let Err(_e) = self.port.write_pins(self.word) {
            self.fault = true;

            #[cfg(feature = "defmt")]
            defmt::warn!("bus: pin write failed: {}", defmt::Debug2Format(&_e));
        }
    }

    /// Read one line; a failed read counts as low
    fn sample(&mut self, mask: PinWord) -> bool {
        match self.port.read_pins() {
            Ok(word) => word & mask != 0,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("bus: pin read failed: {}", defmt::Debug2Format(&_e));
                false
            }
        }
    }

    fn bit_delay(&mut self) {
        self.delay.delay_us(self.timing.bit_delay_us);
    }

    fn finish<T>(&mut self, value: T) -> Result<T, BusError> {
        if core::mem::take(&mut self.fault) {
            Err(BusError::Transport)
        } else {
            Ok(value)
        }
    }
}

impl<P: GpioPort, D: DelayNs> ByteWrite for BitBangBus<'_, P, D> {
    fn write_byte(
        &mut self,
        send_start: bool,
        send_stop: bool,
        data: u8,
    ) -> Result<Ack, BusError> {
        BitBangBus::write_byte(self, send_start, send_stop, data)
    }
}
