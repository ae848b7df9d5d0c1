//! 日期解析
//!
//! 按固定顺序尝试多种格式，第一个成功的结果生效。

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::errors::RosterError;

#[derive(Debug, Clone, Copy)]
enum FieldOrder {
    YearMonthDay,
    DayMonthYear,
    MonthDayYear,
}

/// 固定位数的数字日期格式
struct NumericFormat {
    pattern: Regex,
    order: FieldOrder,
}

impl NumericFormat {
    fn new(pattern: &str, order: FieldOrder) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid numeric date regex"),
            order,
        }
    }

    fn parse(&self, input: &str) -> Option<NaiveDate> {
        let caps = self.pattern.captures(input)?;
        let field = |idx: usize| caps[idx].parse::<u32>().ok();
        let (year, month, day) = match self.order {
            FieldOrder::YearMonthDay => (field(1)?, field(2)?, field(3)?),
            FieldOrder::DayMonthYear => (field(3)?, field(2)?, field(1)?),
            FieldOrder::MonthDayYear => (field(3)?, field(1)?, field(2)?),
        };
        resolve_day_of_month(i32::try_from(year).ok()?, month, day)
    }
}

// 依次尝试：yyyy-MM-dd, dd/MM/yyyy, MM/dd/yyyy, dd-MM-yyyy, yyyy/MM/dd
static FORMATS: Lazy<[NumericFormat; 5]> = Lazy::new(|| {
    [
        NumericFormat::new(r"^(\d{4})-(\d{2})-(\d{2})$", FieldOrder::YearMonthDay),
        NumericFormat::new(r"^(\d{2})/(\d{2})/(\d{4})$", FieldOrder::DayMonthYear),
        NumericFormat::new(r"^(\d{2})/(\d{2})/(\d{4})$", FieldOrder::MonthDayYear),
        NumericFormat::new(r"^(\d{2})-(\d{2})-(\d{4})$", FieldOrder::DayMonthYear),
        NumericFormat::new(r"^(\d{4})/(\d{2})/(\d{2})$", FieldOrder::YearMonthDay),
    ]
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// 形如 "Sat Feb 15 00:00:00 COT 2025"
static VERBOSE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*\w{3}\s+\w{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2}.*\d{4}.*$")
        .expect("Invalid verbose date regex")
});

/// 日期解析失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    Empty,
    InvalidMonth(String),
    Unsupported(String),
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateParseError::Empty => write!(f, "Fecha vacía"),
            DateParseError::InvalidMonth(month) => write!(f, "Mes no válido: {month}"),
            DateParseError::Unsupported(input) => {
                write!(f, "Formato de fecha no soportado: '{input}'")
            }
        }
    }
}

impl std::error::Error for DateParseError {}

impl From<DateParseError> for RosterError {
    fn from(err: DateParseError) -> Self {
        RosterError::date_parse(err.to_string())
    }
}

/// 组装日期，日 29 至 31 超出当月天数时收拢到月末
///
/// 月份必须在 1 至 12，日必须在 1 至 31，年份从 1 开始。
fn resolve_day_of_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if year < 1 || !(1..=31).contains(&day) {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    first.with_day(day.min(last.day()))
}

/// 表格日期序列号转日期
///
/// 以 1899-12-30 为第 0 天，小数部分（时间）舍去。
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = TimeDelta::try_days(serial.trunc() as i64)?;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(days)
}

pub struct DateParser;

impl DateParser {
    pub fn parse(input: &str) -> Result<NaiveDate, DateParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DateParseError::Empty);
        }

        if let Some(date) = FORMATS.iter().find_map(|format| format.parse(trimmed)) {
            return Ok(date);
        }

        if let Some(result) = Self::parse_verbose(trimmed) {
            return result;
        }

        trimmed
            .parse::<f64>()
            .ok()
            .and_then(serial_to_date)
            .ok_or_else(|| DateParseError::Unsupported(trimmed.to_string()))
    }

    /// 按位置取 月/日/年，年份不在第 5 段时取最后一段
    fn parse_verbose(input: &str) -> Option<Result<NaiveDate, DateParseError>> {
        if !VERBOSE_DATE.is_match(input) {
            return None;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.len() < 5 {
            return None;
        }

        let month = match Self::month_number(parts[1]) {
            Some(m) => m,
            None => return Some(Err(DateParseError::InvalidMonth(parts[1].to_string()))),
        };

        let is_year = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
        let year = if is_year(parts[4]) {
            parts[4]
        } else {
            parts[parts.len() - 1]
        };

        let unsupported = || DateParseError::Unsupported(input.to_string());
        let date = match (year.parse::<i32>(), parts[2].parse::<u32>()) {
            (Ok(year), Ok(day)) => NaiveDate::from_ymd_opt(year, month, day).ok_or_else(unsupported),
            _ => Err(unsupported()),
        };

        Some(date)
    }

    fn month_number(abbrev: &str) -> Option<u32> {
        let lower = abbrev.to_lowercase();
        MONTHS
            .iter()
            .position(|m| *m == lower)
            .map(|idx| idx as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_equivalent_renderings() {
        let expected = date(2025, 2, 15);
        assert_eq!(DateParser::parse("2025-02-15"), Ok(expected));
        assert_eq!(DateParser::parse("15/02/2025"), Ok(expected));
        assert_eq!(DateParser::parse("Sat Feb 15 00:00:00 COT 2025"), Ok(expected));
    }

    #[test]
    fn test_fallback_order() {
        // 日/月 优先于 月/日
        assert_eq!(DateParser::parse("03/04/2025"), Ok(date(2025, 4, 3)));
        assert_eq!(DateParser::parse("02/15/2025"), Ok(date(2025, 2, 15)));
        assert_eq!(DateParser::parse("15-02-2025"), Ok(date(2025, 2, 15)));
        assert_eq!(DateParser::parse("2025/02/15"), Ok(date(2025, 2, 15)));
        assert_eq!(DateParser::parse("  2025-02-15  "), Ok(date(2025, 2, 15)));
    }

    #[test]
    fn test_verbose_year_position() {
        assert_eq!(
            DateParser::parse("Mon Mar 3 10:15:00 2025"),
            Ok(date(2025, 3, 3))
        );
        assert_eq!(
            DateParser::parse("Tue Dec 30 00:00:00 GMT-05:00 2025"),
            Ok(date(2025, 12, 30))
        );
    }

    #[test]
    fn test_verbose_invalid_month() {
        assert_eq!(
            DateParser::parse("Sat Xyz 15 00:00:00 COT 2025"),
            Err(DateParseError::InvalidMonth("Xyz".to_string()))
        );
    }

    #[test]
    fn test_serial_fallback() {
        assert_eq!(DateParser::parse("45703"), Ok(date(2025, 2, 15)));
        assert_eq!(DateParser::parse("45703.75"), Ok(date(2025, 2, 15)));
        assert_eq!(serial_to_date(1.0), Some(date(1899, 12, 31)));
        assert_eq!(serial_to_date(f64::NAN), None);
        assert_eq!(serial_to_date(f64::INFINITY), None);
    }

    #[test]
    fn test_short_years_rejected() {
        assert!(DateParser::parse("15-02-25").is_err());
    }

    #[test]
    fn test_failures_are_typed() {
        assert_eq!(DateParser::parse(""), Err(DateParseError::Empty));
        assert_eq!(DateParser::parse("   "), Err(DateParseError::Empty));
        assert_eq!(
            DateParser::parse("mañana"),
            Err(DateParseError::Unsupported("mañana".to_string()))
        );
        assert!(DateParser::parse("1e400").is_err());
    }

    #[test]
    fn test_day_overflow_clamped_to_month_end() {
        assert_eq!(DateParser::parse("2025-02-30"), Ok(date(2025, 2, 28)));
        assert_eq!(DateParser::parse("31/04/2025"), Ok(date(2025, 4, 30)));
        assert_eq!(DateParser::parse("2024-02-31"), Ok(date(2024, 2, 29)));
        assert_eq!(DateParser::parse("02/30/2025"), Ok(date(2025, 2, 28)));
        assert!(DateParser::parse("2025-02-32").is_err());
        assert!(DateParser::parse("2025-02-00").is_err());
        assert!(DateParser::parse("2025-13-01").is_err());
    }

    #[test]
    fn test_fields_need_two_digits() {
        assert_eq!(
            DateParser::parse("5/2/2025"),
            Err(DateParseError::Unsupported("5/2/2025".to_string()))
        );
        assert!(DateParser::parse("2025-2-5").is_err());
        assert!(DateParser::parse("15/2/2025").is_err());
    }
}
