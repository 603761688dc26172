//! Raw port check: blink LEDs on the clock and data lines

use embedded_hal::delay::DelayNs;
use pinbang_hal::{GpioPort, PinMap};

use crate::cancel::CancelToken;

/// Alternations in the stock blink run
pub const BLINK_CYCLES: u32 = 10;

const HOLD_MS: u32 = 1_000;
const TOGGLE_MS: u32 = 200;

/// Light both lines, darken both, then alternate data and clock `cycles`
/// times and switch everything off
///
/// Returns the number of completed alternations. Stops at the first failed
/// port write; the lines are left as last written.
pub fn blink<P: GpioPort>(
    port: &mut P,
    pins: PinMap,
    pause: &mut impl DelayNs,
    cycles: u32,
    cancel: &CancelToken,
) -> Result<u32, P::Error> {
    port.write_pins(pins.both())?;
    pause.delay_ms(HOLD_MS);
    port.write_pins(0)?;
    pause.delay_ms(HOLD_MS);

    let mut completed = 0;
    while completed < cycles && !cancel.is_cancelled() {
        port.write_pins(pins.data)?;
        pause.delay_ms(TOGGLE_MS);
        port.write_pins(pins.clock)?;
        pause.delay_ms(TOGGLE_MS);
        completed += 1;
    }

    port.write_pins(0)?;
    pause.delay_ms(HOLD_MS);

    #[cfg(feature = "defmt")]
    defmt::info!("blink: {=u32} cycles", completed);

    Ok(completed)
}
