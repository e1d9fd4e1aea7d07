use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MONTH_FORMAT: &str = "%Y-%m";
pub const YEAR_FORMAT: &str = "%Y";

/// 一条支出记录。
///
/// 时间冗余存成四个字符串，按日/月/年筛选时直接比较，不再解析。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub time: String,
    pub date: String,
    pub month: String,
    pub year: String,
    pub category: String,
    pub remark: String,
    pub amount: f64,
}

impl Record {
    pub fn new(at: NaiveDateTime, category: &str, remark: &str, amount: f64) -> Self {
        Self {
            time: at.format(TIME_FORMAT).to_string(),
            date: at.format(DATE_FORMAT).to_string(),
            month: at.format(MONTH_FORMAT).to_string(),
            year: at.format(YEAR_FORMAT).to_string(),
            category: category.to_string(),
            remark: remark.to_string(),
            amount: round_amount(amount),
        }
    }

    /// 校验并补全文件里读出的一条记录。
    ///
    /// 缺失的 `date`/`month`/`year` 由 `time` 推出；`time` 无法解析、
    /// 缺分类、金额非正或非有限值的条目会被拒绝。
    pub fn from_stored(value: &serde_json::Value) -> Result<Self, Malformed> {
        let stored: StoredRecord =
            serde_json::from_value(value.clone()).map_err(|_| Malformed::WrongShape)?;

        let time = stored.time.ok_or(Malformed::MissingTime)?;
        let at = NaiveDateTime::parse_from_str(&time, TIME_FORMAT)
            .map_err(|_| Malformed::BadTime(time.clone()))?;
        let category = stored.category.ok_or(Malformed::MissingCategory)?;
        let amount = stored.amount.ok_or(Malformed::MissingAmount)?;
        if !is_valid_amount(amount) {
            return Err(Malformed::BadAmount(amount));
        }

        Ok(Self {
            date: stored
                .date
                .unwrap_or_else(|| at.format(DATE_FORMAT).to_string()),
            month: stored
                .month
                .unwrap_or_else(|| at.format(MONTH_FORMAT).to_string()),
            year: stored
                .year
                .unwrap_or_else(|| at.format(YEAR_FORMAT).to_string()),
            time,
            category,
            remark: stored.remark.unwrap_or_default(),
            amount: round_amount(amount),
        })
    }
}

#[derive(Deserialize)]
struct StoredRecord {
    time: Option<String>,
    date: Option<String>,
    month: Option<String>,
    year: Option<String>,
    category: Option<String>,
    remark: Option<String>,
    amount: Option<f64>,
}

/// 被拒绝的存储条目的原因
#[derive(Debug, Clone, PartialEq)]
pub enum Malformed {
    WrongShape,
    MissingTime,
    BadTime(String),
    MissingCategory,
    MissingAmount,
    BadAmount(f64),
}

impl std::fmt::Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Malformed::WrongShape => write!(f, "not a record object"),
            Malformed::MissingTime => write!(f, "missing time"),
            Malformed::BadTime(t) => write!(f, "unparseable time {t:?}"),
            Malformed::MissingCategory => write!(f, "missing category"),
            Malformed::MissingAmount => write!(f, "missing amount"),
            Malformed::BadAmount(a) => write!(f, "invalid amount {a}"),
        }
    }
}

/// 保留两位小数
pub fn round_amount(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// 有限且保留两位小数后仍大于 0
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && round_amount(amount) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_new_derives_time_fields() {
        let r = Record::new(at(2024, 3, 7, 9, 5), "吃饭", "早餐", 12.346);
        assert_eq!(r.time, "2024-03-07 09:05");
        assert_eq!(r.date, "2024-03-07");
        assert_eq!(r.month, "2024-03");
        assert_eq!(r.year, "2024");
        assert_eq!(r.amount, 12.35);
    }

    #[test]
    fn test_serialized_field_names() {
        let r = Record::new(at(2024, 1, 1, 0, 0), "交通", "", 3.0);
        let value = serde_json::to_value(&r).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["amount", "category", "date", "month", "remark", "time", "year"]
        );
    }

    #[test]
    fn test_from_stored_fills_missing_derived_fields() {
        let value = json!({
            "time": "2023-12-31 23:59",
            "category": "礼物",
            "amount": 88.0
        });
        let r = Record::from_stored(&value).unwrap();
        assert_eq!(r.date, "2023-12-31");
        assert_eq!(r.month, "2023-12");
        assert_eq!(r.year, "2023");
        assert_eq!(r.remark, "");
    }

    #[test]
    fn test_from_stored_rejects_bad_entries() {
        let no_time = json!({"category": "吃饭", "amount": 1.0});
        assert_eq!(Record::from_stored(&no_time), Err(Malformed::MissingTime));

        let bad_time = json!({"time": "yesterday", "category": "吃饭", "amount": 1.0});
        assert!(matches!(
            Record::from_stored(&bad_time),
            Err(Malformed::BadTime(_))
        ));

        let negative = json!({"time": "2024-01-01 10:00", "category": "吃饭", "amount": -2.0});
        assert_eq!(Record::from_stored(&negative), Err(Malformed::BadAmount(-2.0)));

        let rounds_to_zero =
            json!({"time": "2024-01-01 10:00", "category": "吃饭", "amount": 0.004});
        assert_eq!(
            Record::from_stored(&rounds_to_zero),
            Err(Malformed::BadAmount(0.004))
        );

        let string_amount = json!({"time": "2024-01-01 10:00", "category": "吃饭", "amount": "5"});
        assert_eq!(Record::from_stored(&string_amount), Err(Malformed::WrongShape));

        assert_eq!(Record::from_stored(&json!(42)), Err(Malformed::WrongShape));
    }

    #[test]
    fn test_round_amount() {
        assert_eq!(round_amount(0.125), 0.13);
        assert_eq!(round_amount(10.0), 10.0);
        assert_eq!(round_amount(19.999), 20.0);
    }
}
