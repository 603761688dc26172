//! Test doubles shared by the driver tests

use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use pinbang_hal::{GpioPort, PinMap, PinWord, PortError};

use crate::bus::{Ack, BusError, ByteWrite};

/// Mock port that records every written word
///
/// Reads return the last written word (open-drain lines read back what the
/// master released), with optional external pull-downs applied on top.
pub struct MockPort {
    pub open: bool,
    pub pins: PinMap,
    pub writes: Vec<PinWord>,
    pub reads: usize,
    /// Something on the bus holds the clock low
    pub clock_stuck_low: bool,
    /// Something on the bus holds data low (a receiver acknowledging)
    pub data_pulled_low: bool,
    pub fail_writes: bool,
    pub fail_reads: bool,
    word: PinWord,
}

impl MockPort {
    pub fn new() -> Self {
        Self {
            open: true,
            pins: PinMap::FT232R,
            writes: Vec::new(),
            reads: 0,
            clock_stuck_low: false,
            data_pulled_low: false,
            fail_writes: false,
            fail_reads: false,
            word: 0,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            ..Self::new()
        }
    }
}

impl GpioPort for MockPort {
    type Error = PortError;

    fn open(&mut self) -> Result<(), PortError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn write_pins(&mut self, word: PinWord) -> Result<(), PortError> {
        self.writes.push(word);
        if self.fail_writes {
            return Err(PortError::WriteFailed);
        }
        self.word = word;
        Ok(())
    }

    fn read_pins(&mut self) -> Result<PinWord, PortError> {
        self.reads += 1;
        if self.fail_reads {
            return Err(PortError::ReadFailed);
        }
        let mut word = self.word;
        if self.clock_stuck_low {
            word &= !self.pins.clock;
        }
        if self.data_pulled_low {
            word &= !self.pins.data;
        }
        Ok(word)
    }
}

/// Delay that only accumulates the requested time
#[derive(Default)]
pub struct RecordingDelay {
    pub delays_ns: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_us(&self) -> u64 {
        self.delays_ns.iter().map(|&ns| ns as u64).sum::<u64>() / 1000
    }

    pub fn contains_us(&self, us: u32) -> bool {
        self.delays_ns.contains(&(us * 1000))
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(ns);
    }
}

/// One `write_byte` call seen by [`RecordingBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub start: bool,
    pub stop: bool,
    pub data: u8,
}

/// Byte-level fake of the bus
#[derive(Default)]
pub struct RecordingBus {
    pub frames: Vec<Frame>,
    /// Fail every write with a transport error
    pub fail: bool,
}

impl ByteWrite for RecordingBus {
    fn write_byte(&mut self, start: bool, stop: bool, data: u8) -> Result<Ack, BusError> {
        self.frames.push(Frame { start, stop, data });
        if self.fail {
            Err(BusError::Transport)
        } else {
            Ok(Ack::Ack)
        }
    }
}

/// Line-level event decoded from a recorded word stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start,
    Stop,
    Bit(bool),
}

/// Decode I2C-style events: a bit is a full clock-high pulse with stable
/// data, a data edge while the clock is high is a start (falling) or stop
/// (rising). Lines begin released.
pub fn decode_events(pins: PinMap, writes: &[PinWord]) -> Vec<Event> {
    let mut events = Vec::new();
    let mut prev = pins.both();
    let mut pulse: Option<bool> = None;

    for &word in writes {
        let (prev_clock, prev_data) = (prev & pins.clock != 0, prev & pins.data != 0);
        let (clock, data) = (word & pins.clock != 0, word & pins.data != 0);

        if !prev_clock && clock {
            pulse = Some(data);
        } else if prev_clock && clock && prev_data != data {
            events.push(if data { Event::Stop } else { Event::Start });
            pulse = None;
        } else if prev_clock && !clock {
            if let Some(bit) = pulse.take() {
                events.push(Event::Bit(bit));
            }
        }
        prev = word;
    }
    events
}

/// Group decoded bus events into transactions of bytes (ack slots dropped)
pub fn decode_transactions(events: &[Event]) -> Vec<Vec<u8>> {
    let mut transactions: Vec<Vec<u8>> = Vec::new();
    let mut bits: Vec<bool> = Vec::new();

    for event in events {
        match event {
            Event::Start => {
                transactions.push(Vec::new());
                bits.clear();
            }
            Event::Stop => bits.clear(),
            Event::Bit(bit) => {
                bits.push(*bit);
                if bits.len() == 9 {
                    let byte = bits[..8].iter().fold(0u8, |acc, &b| (acc << 1) | b as u8);
                    if let Some(current) = transactions.last_mut() {
                        current.push(byte);
                    }
                    bits.clear();
                }
            }
        }
    }
    transactions
}

/// Decode TM1637 frames: data sampled on rising clock edges, bytes LSB-first
/// followed by one acknowledge clock
pub fn decode_tm1637(pins: PinMap, writes: &[PinWord]) -> Vec<Vec<u8>> {
    let mut frames: Vec<Vec<u8>> = Vec::new();
    let mut bits: Vec<bool> = Vec::new();
    let mut prev = pins.both();

    for &word in writes {
        let (prev_clock, prev_data) = (prev & pins.clock != 0, prev & pins.data != 0);
        let (clock, data) = (word & pins.clock != 0, word & pins.data != 0);

        if !prev_clock && clock {
            bits.push(data);
            if bits.len() == 9 {
                let byte = bits[..8]
                    .iter()
                    .rev()
                    .fold(0u8, |acc, &b| (acc << 1) | b as u8);
                if let Some(frame) = frames.last_mut() {
                    frame.push(byte);
                }
                bits.clear();
            }
        } else if prev_clock && clock && prev_data && !data {
            frames.push(Vec::new());
            bits.clear();
        }
        prev = word;
    }
    frames
}
