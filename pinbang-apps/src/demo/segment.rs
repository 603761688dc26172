//! TM1637 showcase

use embedded_hal::delay::DelayNs;
use pinbang_drivers::Tm1637;
use pinbang_hal::GpioPort;

use super::DemoStats;
use crate::cancel::CancelToken;

/// Number of pattern frames the stock showcase plays
pub const SHOWCASE_FRAMES: usize = 25;

const SELF_TEST_PAUSE_MS: u32 = 1_000;
const STEP_PAUSE_MS: u32 = 100;
const SWEEP_ROUNDS: usize = 3;

/// Self test, all segments lit, brightness sweep, then `frames`
///
/// The sweep ramps brightness 1 to 8 three times. Each frame is four raw
/// segment bytes shown without the colon for 100 ms.
pub fn segment_showcase<P: GpioPort, D: DelayNs>(
    display: &mut Tm1637<'_, P, D>,
    pause: &mut impl DelayNs,
    frames: impl IntoIterator<Item = [u8; 4]>,
    cancel: &CancelToken,
) -> DemoStats {
    let mut stats = DemoStats::default();

    stats.record(display.run_self_test());
    pause.delay_ms(SELF_TEST_PAUSE_MS);
    if cancel.is_cancelled() {
        return stats;
    }

    stats.record(display.set_digits([0xFF; 4], true));

    for _ in 0..SWEEP_ROUNDS {
        for level in 1..=8 {
            if cancel.is_cancelled() {
                return stats;
            }
            stats.record(display.set_brightness(level));
            pause.delay_ms(STEP_PAUSE_MS);
        }
    }

    for frame in frames {
        if cancel.is_cancelled() {
            break;
        }
        stats.record(display.set_digits(frame, false));
        pause.delay_ms(STEP_PAUSE_MS);
    }
    stats
}
