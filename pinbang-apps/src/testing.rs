//! Fakes for running the demo sequences without hardware

use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use pinbang_drivers::{Ack, BusError, ByteWrite};
use pinbang_hal::{GpioPort, PinMap, PinWord, PortError};

use crate::cancel::CancelToken;
use crate::telemetry::{ClockTime, Telemetry};

/// Delay that returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Pause provider that records every pause and cancels after `limit` of them
pub struct CancelAfter {
    pub token: CancelToken,
    pub limit: usize,
    pub pauses_ms: Vec<u32>,
}

impl CancelAfter {
    pub fn new(token: &CancelToken, limit: usize) -> Self {
        Self {
            token: token.clone(),
            limit,
            pauses_ms: Vec::new(),
        }
    }
}

impl DelayNs for CancelAfter {
    fn delay_ns(&mut self, ns: u32) {
        self.pauses_ms.push(ns / 1_000_000);
        if self.pauses_ms.len() >= self.limit {
            self.token.cancel();
        }
    }
}

/// Byte-level bus fake: records `(start, stop, data)` per write
#[derive(Default)]
pub struct FrameBus {
    pub frames: Vec<(bool, bool, u8)>,
    /// Fail every write once this many frames are recorded
    pub fail_after: Option<usize>,
}

impl ByteWrite for FrameBus {
    fn write_byte(&mut self, start: bool, stop: bool, data: u8) -> Result<Ack, BusError> {
        let fail = self.fail_after.is_some_and(|n| self.frames.len() >= n);
        self.frames.push((start, stop, data));
        if fail {
            Err(BusError::Transport)
        } else {
            Ok(Ack::Ack)
        }
    }
}

impl FrameBus {
    /// Bytes written to the LCD data register, reassembled from nibbles
    pub fn lcd_text(&self) -> Vec<u8> {
        self.lcd_bytes()
            .into_iter()
            .filter_map(|(data, byte)| data.then_some(byte))
            .collect()
    }

    /// Instruction bytes written to the LCD
    pub fn lcd_commands(&self) -> Vec<u8> {
        self.lcd_bytes()
            .into_iter()
            .filter_map(|(data, byte)| (!data).then_some(byte))
            .collect()
    }

    /// `(is_data, byte)` pairs; every nibble is a strobe/latch frame pair
    fn lcd_bytes(&self) -> Vec<(bool, u8)> {
        let latched: Vec<u8> = self.frames.chunks(2).map(|pair| pair[1].2).collect();
        latched
            .chunks(2)
            .map(|pair| (pair[0] & 0x01 != 0, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }
}

/// Port that records every written word
pub struct FakePort {
    pub open: bool,
    pub writes: Vec<PinWord>,
    pub fail_after: Option<usize>,
    word: PinWord,
}

impl FakePort {
    pub fn new() -> Self {
        Self {
            open: true,
            writes: Vec::new(),
            fail_after: None,
            word: 0,
        }
    }
}

impl GpioPort for FakePort {
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
        if self.fail_after.is_some_and(|n| self.writes.len() >= n) {
            return Err(PortError::WriteFailed);
        }
        self.writes.push(word);
        self.word = word;
        Ok(())
    }

    fn read_pins(&mut self) -> Result<PinWord, PortError> {
        Ok(self.word)
    }
}

/// TM1637 frames in a word stream: a frame opens when data falls while the
/// clock is high, bits are sampled on rising clock edges, LSB first, each
/// byte followed by one acknowledge clock
pub fn tm1637_frames(pins: PinMap, writes: &[PinWord]) -> Vec<Vec<u8>> {
    let mut frames: Vec<Vec<u8>> = Vec::new();
    let mut bits: Vec<bool> = Vec::new();
    let mut prev = pins.both();

    for &word in writes {
        let prev_clock = prev & pins.clock != 0;
        let clock = word & pins.clock != 0;
        let data = word & pins.data != 0;

        if !prev_clock && clock {
            bits.push(data);
            if bits.len() == 9 {
                let byte = bits[..8]
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &b)| acc | (u8::from(b) << i));
                if let Some(frame) = frames.last_mut() {
                    frame.push(byte);
                }
                bits.clear();
            }
        } else if prev_clock && clock && prev & pins.data != 0 && !data {
            frames.push(Vec::new());
            bits.clear();
        }
        prev = word;
    }
    frames
}

/// Fixed telemetry readings
#[derive(Default)]
pub struct FixedTelemetry {
    pub millicelsius: Option<i32>,
    pub memory_kib: Option<u64>,
    pub time: Option<ClockTime>,
}

impl Telemetry for FixedTelemetry {
    fn temperature_millicelsius(&mut self) -> Option<i32> {
        self.millicelsius
    }

    fn available_memory_kib(&mut self) -> Option<u64> {
        self.memory_kib
    }

    fn clock(&mut self) -> Option<ClockTime> {
        self.time
    }
}
