//! Shift window and overtime arithmetic
//!
//! The window is anchored on the *login's* calendar day: `shift_start`
//! and `shift_end` (HH:mm, site timezone) are placed on that date, and an
//! end at or before the start rolls to the next day (overnight shift).
//! Overtime for a completed pair is measured against the window of its
//! own `in` timestamp, never against "now".

use chrono::NaiveTime;
use chrono_tz::Tz;

use shared::models::ShiftSnapshot;

use crate::utils::time::{date_hms_to_millis, local_date_of};

/// Concrete shift bounds for one login, Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start_millis: i64,
    pub end_millis: i64,
}

impl ShiftWindow {
    pub fn duration_millis(&self) -> i64 {
        self.end_millis - self.start_millis
    }
}

/// Place the configured shift on the login's calendar day
pub fn shift_window(
    login_millis: i64,
    shift_start: NaiveTime,
    shift_end: NaiveTime,
    tz: Tz,
) -> ShiftWindow {
    let login_date = local_date_of(login_millis, tz);
    let start_millis = date_hms_to_millis(login_date, shift_start, tz);
    let mut end_millis = date_hms_to_millis(login_date, shift_end, tz);

    // Numerically earlier end means the shift crosses midnight
    if end_millis <= start_millis {
        let next_day = login_date.succ_opt().unwrap_or(login_date);
        end_millis = date_hms_to_millis(next_day, shift_end, tz);
    }

    ShiftWindow {
        start_millis,
        end_millis,
    }
}

/// Elapsed fraction of the shift since login, clamped to [0, 1]
///
/// The denominator is always the configured window duration
/// (`shift_end - shift_start`), not a fixed day length.
pub fn progress(login_millis: i64, now_millis: i64, window: &ShiftWindow) -> f64 {
    let duration = window.duration_millis();
    if duration <= 0 {
        return 0.0;
    }
    let elapsed = (now_millis - login_millis) as f64 / duration as f64;
    elapsed.clamp(0.0, 1.0)
}

/// Overtime for a clock-out against its login's shift end; zero when the
/// out lands at or before the window end
pub fn overtime_millis(out_millis: i64, window: &ShiftWindow) -> i64 {
    (out_millis - window.end_millis).max(0)
}

/// Snapshot for the kiosk confirmation screen
pub fn snapshot(login_millis: i64, now_millis: i64, window: &ShiftWindow) -> ShiftSnapshot {
    ShiftSnapshot {
        shift_start_at: window.start_millis,
        shift_end_at: window.end_millis,
        progress: progress(login_millis, now_millis, window),
        overtime_millis: overtime_millis(now_millis, window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::UTC;

    use crate::utils::time::parse_hhmm;

    fn millis(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> i64 {
        date_hms_to_millis(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(hh, mm, 0).unwrap(),
            UTC,
        )
    }

    #[test]
    fn day_shift_window_lands_on_login_day() {
        let login = millis(2025, 3, 10, 7, 45);
        let w = shift_window(
            login,
            parse_hhmm("07:30").unwrap(),
            parse_hhmm("18:00").unwrap(),
            UTC,
        );
        assert_eq!(w.start_millis, millis(2025, 3, 10, 7, 30));
        assert_eq!(w.end_millis, millis(2025, 3, 10, 18, 0));
    }

    #[test]
    fn overnight_shift_end_rolls_to_next_day() {
        let login = millis(2025, 3, 10, 22, 30);
        let w = shift_window(
            login,
            parse_hhmm("22:00").unwrap(),
            parse_hhmm("06:00").unwrap(),
            UTC,
        );
        assert_eq!(w.start_millis, millis(2025, 3, 10, 22, 0));
        assert_eq!(w.end_millis, millis(2025, 3, 11, 6, 0));
    }

    #[test]
    fn overtime_is_zero_at_or_before_shift_end() {
        let login = millis(2025, 3, 10, 8, 0);
        let w = shift_window(
            login,
            parse_hhmm("07:30").unwrap(),
            parse_hhmm("18:00").unwrap(),
            UTC,
        );
        assert_eq!(overtime_millis(w.end_millis, &w), 0);
        assert_eq!(overtime_millis(w.end_millis - 1, &w), 0);
        assert_eq!(overtime_millis(w.end_millis + 90 * 60 * 1000, &w), 90 * 60 * 1000);
    }

    #[test]
    fn progress_clamps_to_unit_interval() {
        let login = millis(2025, 3, 10, 7, 30);
        let w = shift_window(
            login,
            parse_hhmm("07:30").unwrap(),
            parse_hhmm("18:00").unwrap(),
            UTC,
        );
        assert_eq!(progress(login, login - 1000, &w), 0.0);
        assert_eq!(progress(login, login + 2 * w.duration_millis(), &w), 1.0);

        // Halfway through the window duration
        let halfway = login + w.duration_millis() / 2;
        let p = progress(login, halfway, &w);
        assert!((p - 0.5).abs() < 1e-9);
    }
}
