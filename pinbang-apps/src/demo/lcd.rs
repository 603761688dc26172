//! 16x2 LCD demos

use embedded_hal::delay::DelayNs;
use pinbang_drivers::{ByteWrite, Lcd1602};

use super::{DemoStats, SCREEN_PAUSE_MS};
use crate::cancel::CancelToken;
use crate::format;
use crate::telemetry::Telemetry;

/// Degree sign in the HD44780 A00 character ROM
pub const DEGREE_SIGN: u8 = 0xDF;

/// Alternate "Hello!" and "World!" with a blinking cursor, then clear
pub fn hello_loop<B: ByteWrite, D: DelayNs>(
    lcd: &mut Lcd1602<B, D>,
    pause: &mut impl DelayNs,
    cancel: &CancelToken,
) -> DemoStats {
    let mut stats = DemoStats::default();
    stats.record(lcd.cursor(true).and(lcd.blink(true)));

    while !cancel.is_cancelled() {
        stats.record(lcd.move_cursor(0, 0).and(lcd.put_str("Hello!")));
        pause.delay_ms(SCREEN_PAUSE_MS);

        stats.record(lcd.move_cursor(1, 0).and(lcd.put_str("World!")));
        pause.delay_ms(SCREEN_PAUSE_MS);

        stats.record(lcd.clear());
        pause.delay_ms(SCREEN_PAUSE_MS);
    }
    stats
}

/// Refresh temperature, time and free memory once a second
///
/// ```text
/// 45.3°C  12:34:56
/// 4019 MB
/// ```
///
/// The clock is whatever `telemetry` reports; [`HostTelemetry`] gives UTC,
/// not local time.
///
/// [`HostTelemetry`]: crate::HostTelemetry
pub fn status_loop<B: ByteWrite, D: DelayNs>(
    lcd: &mut Lcd1602<B, D>,
    telemetry: &mut impl Telemetry,
    pause: &mut impl DelayNs,
    cancel: &CancelToken,
) -> DemoStats {
    let mut stats = DemoStats::default();
    stats.record(lcd.cursor(false).and(lcd.blink(false)));

    while !cancel.is_cancelled() {
        let temperature = format::temperature(telemetry.temperature_millicelsius());
        let clock = format::clock(telemetry.clock());
        let memory = format::memory(telemetry.available_memory_kib());

        let result = lcd
            .move_cursor(0, 0)
            .and(lcd.put_str(&temperature))
            .and(lcd.put_char(DEGREE_SIGN))
            .and(lcd.put_char(b'C'))
            .and(lcd.move_cursor(0, 8))
            .and(lcd.put_str(&clock))
            .and(lcd.move_cursor(1, 0))
            .and(lcd.put_str(&memory));
        stats.record(result);

        pause.delay_ms(SCREEN_PAUSE_MS);
    }
    stats
}
