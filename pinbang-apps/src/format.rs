//! Fixed-capacity text for the status screen
//!
//! Placeholders keep the same width as real values so a missing reading
//! overwrites the previous one on the LCD.

use core::fmt::Write;

use heapless::String;

use crate::telemetry::ClockTime;

/// Temperature with one decimal, at least two integer digits (`"45.3"`,
/// `"07.5"`). Millidegrees are truncated to tenths, not rounded.
pub fn temperature(millicelsius: Option<i32>) -> String<12> {
    let mut text = String::new();
    match millicelsius {
        Some(milli) => {
            let tenths = milli / 100;
            let sign = if tenths < 0 { "-" } else { "" };
            let tenths = tenths.unsigned_abs();
            // Same field width with or without the sign
            let width = if sign.is_empty() { 2 } else { 1 };
            let _ = write!(text, "{}{:0width$}.{}", sign, tenths / 10, tenths % 10);
        }
        None => {
            let _ = text.push_str("--.-");
        }
    }
    text
}

/// `"HH:MM:SS"`
pub fn clock(time: Option<ClockTime>) -> String<8> {
    let mut text = String::new();
    match time {
        Some(t) => {
            let _ = write!(text, "{:02}:{:02}:{:02}", t.hours, t.minutes, t.seconds);
        }
        None => {
            let _ = text.push_str("--:--:--");
        }
    }
    text
}

/// Available memory in whole MiB, `"<n> MB"`
pub fn memory(kib: Option<u64>) -> String<24> {
    let mut text = String::new();
    match kib {
        Some(kib) => {
            let _ = write!(text, "{} MB", kib / 1024);
        }
        None => {
            let _ = text.push_str("-- MB");
        }
    }
    text
}
