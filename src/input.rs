//! 界面输入的校验。校验在进入查询和存储之前完成。

use crate::error::ValidationError;
use crate::query::TimeFilter;
use crate::record::round_amount;

pub fn parse_amount(text: &str) -> Result<f64, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }
    let amount: f64 = text.parse().map_err(|_| ValidationError::InvalidAmount)?;
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount);
    }
    let amount = round_amount(amount);
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

pub fn check_category<'a>(
    category: &'a str,
    categories: &[String],
) -> Result<&'a str, ValidationError> {
    if categories.iter().any(|c| c == category) {
        Ok(category)
    } else {
        Err(ValidationError::UnknownCategory(category.to_string()))
    }
}

/// 把分开输入的年、月、日拼成筛选目标（`YYYY-MM-DD` / `YYYY-MM` / `YYYY`）。
///
/// 不需要目标的筛选方式返回空串。
pub fn compose_target(
    kind: TimeFilter,
    year: &str,
    month: &str,
    day: &str,
) -> Result<String, ValidationError> {
    match kind {
        TimeFilter::All | TimeFilter::Today | TimeFilter::ThisMonth | TimeFilter::ThisYear => {
            Ok(String::new())
        }
        TimeFilter::ByYear => {
            let y = parse_year(year)?;
            Ok(format!("{y:04}"))
        }
        TimeFilter::ByMonth => {
            let y = parse_year(year)?;
            let m = parse_month(month)?;
            Ok(format!("{y:04}-{m:02}"))
        }
        TimeFilter::ByDay => {
            let y = parse_year(year)?;
            let m = parse_month(month)?;
            let d = parse_day(y, m, day)?;
            Ok(format!("{y:04}-{m:02}-{d:02}"))
        }
    }
}

fn parse_year(text: &str) -> Result<i32, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::MissingYear);
    }
    if text.len() != 4 || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidYear);
    }
    text.parse().map_err(|_| ValidationError::InvalidYear)
}

fn parse_month(text: &str) -> Result<u32, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::MissingMonth);
    }
    match text.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(m),
        _ => Err(ValidationError::MonthOutOfRange),
    }
}

fn parse_day(year: i32, month: u32, text: &str) -> Result<u32, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::MissingDay);
    }
    match text.parse::<u32>() {
        Ok(d) if (1..=days_in_month(year, month)).contains(&d) => Ok(d),
        _ => Err(ValidationError::DayOutOfRange),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}
