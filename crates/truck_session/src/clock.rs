//! Wall-clock access for query time bounds.

use time::OffsetDateTime;

/// Source of the current local hour.
pub trait Clock {
    /// Current hour of day, `0..=23`.
    fn current_hour(&self) -> u8;
}

/// Reads the process-local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u8 {
        // Local offset lookup fails on some platforms once threads exist.
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .hour()
    }
}

/// Clock pinned to one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u8);

impl Clock for FixedClock {
    fn current_hour(&self) -> u8 {
        self.0 % 24
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_hour(&self) -> u8 {
        (**self).current_hour()
    }
}

/// Formats an hour the way the resource's time columns are filtered.
///
/// Hours up to and including 12 are suffixed `AM`, later hours are shifted
/// down by 12 and suffixed `PM`. Midnight renders as `0AM` and noon as
/// `12AM`; both are known defects kept for compatibility with existing
/// queries.
pub fn format_hour(hour: u8) -> String {
    if hour <= 12 {
        format!("{hour}AM")
    } else {
        format!("{}PM", hour - 12)
    }
}
