//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler / 引擎层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}

/// 解析时刻字符串 (HH:mm)
pub fn parse_hhmm(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time format: {}", time)))
}

/// 日期 + 时分秒毫秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, NaiveTime::MIN, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, NaiveTime::MIN, tz)
}

/// 日期最后一毫秒 (23:59:59.999) → Unix millis (业务时区)
///
/// 对账任务补写的下班记录使用该时间戳。
pub fn end_of_day_millis(date: NaiveDate, tz: Tz) -> i64 {
    day_end_millis(date, tz) - 1
}

/// Unix millis → 业务时区的日历日期
pub fn local_date_of(millis: i64, tz: Tz) -> NaiveDate {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive())
}

/// 当前业务时区日期
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 当前业务时区日期字符串 (YYYY-MM-DD)，对账守卫使用
pub fn today_string(tz: Tz) -> String {
    today(tz).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_times() {
        assert!(parse_date("2025-03-01").is_ok());
        assert!(parse_date("01/03/2025").is_err());
        assert_eq!(
            parse_hhmm("07:30").unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
        assert!(parse_hhmm("7h30").is_err());
    }

    #[test]
    fn day_bounds_are_exclusive_end() {
        let tz = chrono_tz::UTC;
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        assert_eq!(end - start, 24 * 3600 * 1000);
        assert_eq!(end_of_day_millis(date, tz), end - 1);
    }

    #[test]
    fn local_date_roundtrip() {
        let tz = chrono_tz::UTC;
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let noon = date_hms_to_millis(date, NaiveTime::from_hms_opt(12, 0, 0).unwrap(), tz);
        assert_eq!(local_date_of(noon, tz), date);
    }
}
