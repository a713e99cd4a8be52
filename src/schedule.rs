//! Weekly Operating Hours

use jiff::{
    civil::{Time, Weekday},
    tz::TimeZone,
};
use smallvec::SmallVec;
use thiserror::Error;

use crate::interval::BookingInterval;

/// Errors raised when building a weekly window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The closing time is not after the opening time.
    #[error("window closes at {closes_at}, before it opens at {opens_at}")]
    ClosesBeforeOpening {
        /// Opening time.
        opens_at: Time,

        /// Closing time.
        closes_at: Time,
    },
}

/// Opening hours of a space for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyWindow {
    weekday: Weekday,
    opens_at: Time,
    closes_at: Time,
}

impl WeeklyWindow {
    /// Create a new window.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::ClosesBeforeOpening`] unless `opens_at < closes_at`.
    pub fn new(weekday: Weekday, opens_at: Time, closes_at: Time) -> Result<Self, WindowError> {
        if closes_at <= opens_at {
            return Err(WindowError::ClosesBeforeOpening { opens_at, closes_at });
        }

        Ok(Self {
            weekday,
            opens_at,
            closes_at,
        })
    }

    /// Weekday this window applies to.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Local opening time.
    pub fn opens_at(&self) -> Time {
        self.opens_at
    }

    /// Local closing time.
    pub fn closes_at(&self) -> Time {
        self.closes_at
    }

    fn covers(&self, from: Time, to: Time) -> bool {
        self.opens_at <= from && to <= self.closes_at
    }
}

/// Last second of a local day. A booking that ends at the following midnight
/// is measured against it.
const END_OF_DAY: Time = Time::constant(23, 59, 59, 0);

/// Windows for a single weekday. Most spaces declare one or two.
pub type DayWindows = SmallVec<[WeeklyWindow; 4]>;

/// Outcome of checking an interval against operating hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFit {
    /// No windows are defined for the weekday, so any time is allowed.
    Unrestricted,

    /// The interval lies inside one of the windows.
    Within,

    /// The interval falls outside every window.
    Outside,
}

impl ScheduleFit {
    /// Whether the booking may go ahead.
    pub fn is_allowed(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Local weekday on which `interval` starts in `tz`.
pub fn local_weekday(interval: &BookingInterval, tz: &TimeZone) -> Weekday {
    interval.starts_at().to_zoned(tz.clone()).weekday()
}

/// Check `interval` against the windows declared for its local weekday.
///
/// Windows for other weekdays are ignored. An interval ending exactly at the
/// next local midnight is treated as ending at the close of its start day, so
/// a window running to `23:59:59` admits it. Any other interval that crosses
/// local midnight never fits a window.
pub fn check_operating_hours(
    interval: &BookingInterval,
    windows: &[WeeklyWindow],
    tz: &TimeZone,
) -> ScheduleFit {
    let start = interval.starts_at().to_zoned(tz.clone());
    let end = interval.ends_at().to_zoned(tz.clone());

    let mut day_windows = windows
        .iter()
        .filter(|window| window.weekday == start.weekday())
        .peekable();

    if day_windows.peek().is_none() {
        return ScheduleFit::Unrestricted;
    }

    let end_time = if end.date() == start.date() {
        end.time()
    } else if end.time() == Time::midnight() && start.date().tomorrow().ok() == Some(end.date()) {
        END_OF_DAY
    } else {
        return ScheduleFit::Outside;
    };

    if day_windows.any(|window| window.covers(start.time(), end_time)) {
        ScheduleFit::Within
    } else {
        ScheduleFit::Outside
    }
}

#[cfg(test)]
mod tests {
    use jiff::{
        civil::{date, time},
        tz,
    };
    use testresult::TestResult;

    use super::*;

    fn costa_rica() -> TimeZone {
        TimeZone::fixed(tz::offset(-6))
    }

    fn local_interval(day: i8, from: Time, to: Time) -> TestResult<BookingInterval> {
        let tz = costa_rica();
        let starts_at = date(2026, 3, day).to_datetime(from).to_zoned(tz.clone())?;
        let ends_at = date(2026, 3, day).to_datetime(to).to_zoned(tz)?;

        Ok(BookingInterval::new(
            starts_at.timestamp(),
            ends_at.timestamp(),
        )?)
    }

    fn monday_office_hours() -> TestResult<Vec<WeeklyWindow>> {
        Ok(vec![
            WeeklyWindow::new(Weekday::Monday, time(8, 0, 0, 0), time(12, 0, 0, 0))?,
            WeeklyWindow::new(Weekday::Monday, time(13, 0, 0, 0), time(17, 0, 0, 0))?,
        ])
    }

    #[test]
    fn window_must_close_after_opening() {
        let result = WeeklyWindow::new(Weekday::Friday, time(18, 0, 0, 0), time(9, 0, 0, 0));

        assert!(matches!(result, Err(WindowError::ClosesBeforeOpening { .. })));
    }

    #[test]
    fn interval_inside_window_fits() -> TestResult {
        // 2026-03-02 is a Monday.
        let booked = local_interval(2, time(9, 0, 0, 0), time(11, 30, 0, 0))?;

        assert_eq!(local_weekday(&booked, &costa_rica()), Weekday::Monday);
        assert_eq!(
            check_operating_hours(&booked, &monday_office_hours()?, &costa_rica()),
            ScheduleFit::Within
        );

        Ok(())
    }

    #[test]
    fn interval_spanning_lunch_break_is_outside() -> TestResult {
        let booked = local_interval(2, time(11, 0, 0, 0), time(14, 0, 0, 0))?;
        let fit = check_operating_hours(&booked, &monday_office_hours()?, &costa_rica());

        assert_eq!(fit, ScheduleFit::Outside);
        assert!(!fit.is_allowed());

        Ok(())
    }

    #[test]
    fn weekday_without_windows_is_unrestricted() -> TestResult {
        // 2026-03-08 is a Sunday.
        let booked = local_interval(8, time(22, 0, 0, 0), time(23, 0, 0, 0))?;
        let fit = check_operating_hours(&booked, &monday_office_hours()?, &costa_rica());

        assert_eq!(fit, ScheduleFit::Unrestricted);
        assert!(fit.is_allowed());

        Ok(())
    }

    #[test]
    fn interval_ending_exactly_at_close_fits() -> TestResult {
        let booked = local_interval(2, time(15, 0, 0, 0), time(17, 0, 0, 0))?;

        assert_eq!(
            check_operating_hours(&booked, &monday_office_hours()?, &costa_rica()),
            ScheduleFit::Within
        );

        Ok(())
    }

    #[test]
    fn interval_crossing_midnight_is_outside() -> TestResult {
        let tz = costa_rica();
        let windows = [WeeklyWindow::new(
            Weekday::Monday,
            time(0, 0, 0, 0),
            time(23, 59, 59, 0),
        )?];

        let starts_at = date(2026, 3, 2).at(23, 0, 0, 0).to_zoned(tz.clone())?;
        let ends_at = date(2026, 3, 3).at(1, 0, 0, 0).to_zoned(tz.clone())?;
        let booked = BookingInterval::new(starts_at.timestamp(), ends_at.timestamp())?;

        assert_eq!(
            check_operating_hours(&booked, &windows, &tz),
            ScheduleFit::Outside
        );

        Ok(())
    }

    #[test]
    fn booking_ending_at_midnight_fits_a_late_window() -> TestResult {
        let tz = costa_rica();
        let windows = [WeeklyWindow::new(
            Weekday::Monday,
            time(18, 0, 0, 0),
            time(23, 59, 59, 0),
        )?];

        let starts_at = date(2026, 3, 2).at(22, 0, 0, 0).to_zoned(tz.clone())?;
        let ends_at = date(2026, 3, 3).at(0, 0, 0, 0).to_zoned(tz.clone())?;
        let booked = BookingInterval::new(starts_at.timestamp(), ends_at.timestamp())?;

        assert_eq!(
            check_operating_hours(&booked, &windows, &tz),
            ScheduleFit::Within
        );

        let early_close = [WeeklyWindow::new(
            Weekday::Monday,
            time(18, 0, 0, 0),
            time(22, 0, 0, 0),
        )?];

        assert_eq!(
            check_operating_hours(&booked, &early_close, &tz),
            ScheduleFit::Outside
        );

        Ok(())
    }
}
