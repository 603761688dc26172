//! Host readings shown by the status screen

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockTime {
    /// Time of day from seconds since midnight (wraps at 24 h)
    pub const fn from_day_seconds(seconds: u64) -> Self {
        let seconds = seconds % 86_400;
        Self {
            hours: (seconds / 3_600) as u8,
            minutes: (seconds / 60 % 60) as u8,
            seconds: (seconds % 60) as u8,
        }
    }
}

/// Source of the values on the status screen
///
/// `None` means the reading is unavailable right now; the screen shows a
/// placeholder and tries again next refresh.
pub trait Telemetry {
    /// SoC temperature in millidegrees Celsius
    fn temperature_millicelsius(&mut self) -> Option<i32>;

    /// Memory available for new allocations (KiB)
    fn available_memory_kib(&mut self) -> Option<u64>;

    /// Current time of day
    fn clock(&mut self) -> Option<ClockTime>;
}

impl<T: Telemetry + ?Sized> Telemetry for &mut T {
    fn temperature_millicelsius(&mut self) -> Option<i32> {
        T::temperature_millicelsius(self)
    }

    fn available_memory_kib(&mut self) -> Option<u64> {
        T::available_memory_kib(self)
    }

    fn clock(&mut self) -> Option<ClockTime> {
        T::clock(self)
    }
}

/// Linux host readings from sysfs and procfs
#[derive(Debug, Clone)]
pub struct HostTelemetry {
    pub thermal_path: PathBuf,
    pub meminfo_path: PathBuf,
}

impl HostTelemetry {
    /// First thermal zone (the SoC on single-board computers)
    pub const THERMAL_PATH: &'static str = "/sys/class/thermal/thermal_zone0/temp";
    pub const MEMINFO_PATH: &'static str = "/proc/meminfo";
}

impl Default for HostTelemetry {
    fn default() -> Self {
        Self {
            thermal_path: PathBuf::from(Self::THERMAL_PATH),
            meminfo_path: PathBuf::from(Self::MEMINFO_PATH),
        }
    }
}

impl Telemetry for HostTelemetry {
    fn temperature_millicelsius(&mut self) -> Option<i32> {
        let text = fs::read_to_string(&self.thermal_path).ok()?;
        parse_millicelsius(&text)
    }

    fn available_memory_kib(&mut self) -> Option<u64> {
        let text = fs::read_to_string(&self.meminfo_path).ok()?;
        parse_mem_available_kib(&text)
    }

    /// UTC; the host time zone is not consulted
    fn clock(&mut self) -> Option<ClockTime> {
        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        Some(ClockTime::from_day_seconds(since_epoch.as_secs()))
    }
}

/// Parse a thermal-zone `temp` file (one integer, millidegrees)
pub fn parse_millicelsius(text: &str) -> Option<i32> {
    text.lines().next()?.trim().parse().ok()
}

/// Pull the `MemAvailable:` value (kB) out of `/proc/meminfo`
pub fn parse_mem_available_kib(text: &str) -> Option<u64> {
    text.lines()
        .find_map(|line| line.strip_prefix("MemAvailable:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}
