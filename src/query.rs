//! 记录查询：时间筛选、关键词搜索、求和与分桶统计。
//!
//! 全部是纯函数，只读取调用方传入的记录快照。依赖“今天”的函数都有一个
//! `_on` 版本显式接收日期，不带后缀的版本使用本地当前日期。

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::record::{round_amount, Record, DATE_FORMAT, MONTH_FORMAT, YEAR_FORMAT};

/// 按时间筛选的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    All,
    ByDay,
    ByMonth,
    ByYear,
    Today,
    ThisMonth,
    ThisYear,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 7] = [
        TimeFilter::All,
        TimeFilter::ByDay,
        TimeFilter::ByMonth,
        TimeFilter::ByYear,
        TimeFilter::Today,
        TimeFilter::ThisMonth,
        TimeFilter::ThisYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::All => "全部",
            TimeFilter::ByDay => "按日",
            TimeFilter::ByMonth => "按月",
            TimeFilter::ByYear => "按年",
            TimeFilter::Today => "今天",
            TimeFilter::ThisMonth => "本月",
            TimeFilter::ThisYear => "今年",
        }
    }
}

/// 一次查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    All,
    Day(String),
    Month(String),
    Year(String),
    Keyword(String),
}

impl QuerySpec {
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        match self {
            QuerySpec::All => records.to_vec(),
            QuerySpec::Day(target) => filter_by_time(records, TimeFilter::ByDay, target),
            QuerySpec::Month(target) => filter_by_time(records, TimeFilter::ByMonth, target),
            QuerySpec::Year(target) => filter_by_time(records, TimeFilter::ByYear, target),
            QuerySpec::Keyword(keyword) => search(records, keyword),
        }
    }
}

pub fn filter_by_time(records: &[Record], kind: TimeFilter, target: &str) -> Vec<Record> {
    filter_by_time_on(records, kind, target, Local::now().date_naive())
}

/// 按时间筛选，保持原有顺序。
///
/// `ByDay`/`ByMonth`/`ByYear` 的目标为空时不做筛选，与 `All` 一致；
/// `Today`/`ThisMonth`/`ThisYear` 忽略 `target`，由 `today` 计算。
pub fn filter_by_time_on(
    records: &[Record],
    kind: TimeFilter,
    target: &str,
    today: NaiveDate,
) -> Vec<Record> {
    let target = target.trim();
    let wanted = match kind {
        TimeFilter::All => return records.to_vec(),
        TimeFilter::ByDay | TimeFilter::ByMonth | TimeFilter::ByYear if target.is_empty() => {
            return records.to_vec();
        }
        TimeFilter::ByDay | TimeFilter::ByMonth | TimeFilter::ByYear => target.to_string(),
        TimeFilter::Today => today.format(DATE_FORMAT).to_string(),
        TimeFilter::ThisMonth => today.format(MONTH_FORMAT).to_string(),
        TimeFilter::ThisYear => today.format(YEAR_FORMAT).to_string(),
    };
    let field: fn(&Record) -> &str = match kind {
        TimeFilter::ByDay | TimeFilter::Today | TimeFilter::All => date_of,
        TimeFilter::ByMonth | TimeFilter::ThisMonth => month_of,
        TimeFilter::ByYear | TimeFilter::ThisYear => year_of,
    };

    records
        .iter()
        .filter(|r| field(r) == wanted)
        .cloned()
        .collect()
}

fn date_of(r: &Record) -> &str {
    &r.date
}

fn month_of(r: &Record) -> &str {
    &r.month
}

fn year_of(r: &Record) -> &str {
    &r.year
}

/// 在分类或备注中做区分大小写的子串匹配；空关键词返回全部
pub fn search(records: &[Record], keyword: &str) -> Vec<Record> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.category.contains(keyword) || r.remark.contains(keyword))
        .cloned()
        .collect()
}

pub fn total(records: &[Record]) -> f64 {
    round_amount(records.iter().map(|r| r.amount).sum())
}

/// 各分类合计，按分类首次出现的顺序
pub fn category_totals(records: &[Record]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for r in records {
        match totals.iter_mut().find(|(c, _)| *c == r.category) {
            Some((_, sum)) => *sum += r.amount,
            None => totals.push((r.category.clone(), r.amount)),
        }
    }
    for (_, sum) in &mut totals {
        *sum = round_amount(*sum);
    }
    totals
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Monthly,
    Daily,
    Yearly,
}

impl Granularity {
    pub fn bucket_count(self) -> usize {
        match self {
            Granularity::Monthly => 12,
            Granularity::Daily => 20,
            Granularity::Yearly => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Monthly => "月度",
            Granularity::Daily => "每日",
            Granularity::Yearly => "年度",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, record: &Record) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.category == *category,
        }
    }
}

/// 一个统计桶。`key` 是与记录比较的完整值，`label` 用于展示。
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: String,
    pub label: String,
    pub total: f64,
}

pub fn aggregate(
    records: &[Record],
    granularity: Granularity,
    category: &CategoryFilter,
) -> Vec<Bucket> {
    aggregate_on(records, granularity, category, Local::now().date_naive())
}

/// 分桶求和。输出长度固定，没有记录的桶为 0。
///
/// - `Monthly`：今年 1 月到 12 月，其他年份的记录不计入
/// - `Daily`：最近 20 天，今天在前
/// - `Yearly`：最近 10 年，今年在前
pub fn aggregate_on(
    records: &[Record],
    granularity: Granularity,
    category: &CategoryFilter,
    today: NaiveDate,
) -> Vec<Bucket> {
    let mut buckets = empty_buckets(granularity, today);
    let field: fn(&Record) -> &str = match granularity {
        Granularity::Monthly => month_of,
        Granularity::Daily => date_of,
        Granularity::Yearly => year_of,
    };

    for r in records.iter().filter(|r| category.matches(r)) {
        // 不落在任何桶里的记录直接忽略
        if let Some(bucket) = buckets.iter_mut().find(|b| b.key == field(r)) {
            bucket.total += r.amount;
        }
    }
    for bucket in &mut buckets {
        bucket.total = round_amount(bucket.total);
    }
    buckets
}

fn empty_buckets(granularity: Granularity, today: NaiveDate) -> Vec<Bucket> {
    let bucket = |key: String, label: String| Bucket {
        key,
        label,
        total: 0.0,
    };
    match granularity {
        Granularity::Monthly => (1..=12)
            .map(|m| bucket(format!("{}-{m:02}", today.year()), format!("{m:02}")))
            .collect(),
        Granularity::Daily => (0..20)
            .map(|back| {
                let day = today - Duration::days(back);
                bucket(day.format(DATE_FORMAT).to_string(), day.format("%m-%d").to_string())
            })
            .collect(),
        Granularity::Yearly => (0..10)
            .map(|back| {
                let year = (today.year() - back).to_string();
                bucket(year.clone(), year)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, category: &str, remark: &str, amount: f64) -> Record {
        Record {
            time: format!("{date} 12:00"),
            date: date.to_string(),
            month: date[..7].to_string(),
            year: date[..4].to_string(),
            category: category.to_string(),
            remark: remark.to_string(),
            amount,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("2024-01-01", "吃饭", "午饭", 10.0),
            rec("2024-01-01", "交通", "打车回家", 5.0),
            rec("2024-02-01", "购物", "Book", 20.0),
        ]
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_all_is_identity() {
        let records = sample();
        let out = filter_by_time(&records, TimeFilter::All, "2099-01-01");
        assert_eq!(out, records);
        assert_eq!(total(&out), total(&records));
    }

    #[test]
    fn test_filter_by_day_month_year() {
        let records = sample();
        let by_day = filter_by_time(&records, TimeFilter::ByDay, "2024-01-01");
        assert_eq!(by_day, records[..2]);
        assert_eq!(total(&by_day), 15.0);

        let by_month = filter_by_time(&records, TimeFilter::ByMonth, "2024-02");
        assert_eq!(by_month, records[2..]);

        assert_eq!(filter_by_time(&records, TimeFilter::ByYear, "2024").len(), 3);
        assert!(filter_by_time(&records, TimeFilter::ByYear, "2023").is_empty());
    }

    #[test]
    fn test_empty_target_does_not_filter() {
        let records = sample();
        for kind in [TimeFilter::ByDay, TimeFilter::ByMonth, TimeFilter::ByYear] {
            assert_eq!(filter_by_time(&records, kind, ""), records);
            assert_eq!(filter_by_time(&records, kind, "  "), records);
        }
    }

    #[test]
    fn test_relative_filters_use_today() {
        let records = sample();
        let today = day(2024, 1, 1);
        assert_eq!(filter_by_time_on(&records, TimeFilter::Today, "", today).len(), 2);
        assert_eq!(
            filter_by_time_on(&records, TimeFilter::ThisMonth, "2024-02", today).len(),
            2
        );
        assert_eq!(filter_by_time_on(&records, TimeFilter::ThisYear, "", today).len(), 3);
        assert!(filter_by_time_on(&records, TimeFilter::Today, "", day(2025, 1, 1)).is_empty());
    }

    #[test]
    fn test_search_matches_category_or_remark() {
        let records = sample();
        let hits = search(&records, "饭");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].remark, "午饭");

        let hits = search(&records, "交通");
        assert_eq!(hits, records[1..2]);

        assert!(search(&records, "book").is_empty());
        assert_eq!(search(&records, " Book ").len(), 1);
    }

    #[test]
    fn test_search_empty_keyword_returns_input() {
        let records = sample();
        assert_eq!(search(&records, ""), records);
        assert_eq!(search(&records, "   "), records);
    }

    #[test]
    fn test_total_rounds() {
        assert_eq!(total(&[]), 0.0);
        let records = vec![
            rec("2024-01-01", "吃饭", "", 0.1),
            rec("2024-01-01", "吃饭", "", 0.2),
        ];
        assert_eq!(total(&records), 0.3);
    }

    #[test]
    fn test_query_spec_apply() {
        let records = sample();
        assert_eq!(QuerySpec::All.apply(&records), records);
        assert_eq!(QuerySpec::Day("2024-01-01".into()).apply(&records).len(), 2);
        assert_eq!(QuerySpec::Month("2024-01".into()).apply(&records).len(), 2);
        assert_eq!(QuerySpec::Year("2024".into()).apply(&records).len(), 3);
        assert_eq!(QuerySpec::Keyword("购物".into()).apply(&records).len(), 1);
    }

    #[test]
    fn test_category_totals_first_appearance_order() {
        let mut records = sample();
        records.push(rec("2024-03-01", "吃饭", "晚饭", 7.25));
        let totals = category_totals(&records);
        assert_eq!(
            totals,
            vec![
                ("吃饭".to_string(), 17.25),
                ("交通".to_string(), 5.0),
                ("购物".to_string(), 20.0),
            ]
        );
    }

    #[test]
    fn test_monthly_aggregate_current_year_only() {
        let mut records = sample();
        records.push(rec("2023-01-15", "吃饭", "", 99.0));
        let buckets = aggregate_on(&records, Granularity::Monthly, &CategoryFilter::All, day(2024, 6, 1));

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].key, "2024-01");
        assert_eq!(buckets[0].label, "01");
        assert_eq!(buckets[0].total, 15.0);
        assert_eq!(buckets[1].total, 20.0);
        assert!(buckets[2..].iter().all(|b| b.total == 0.0));
        assert_eq!(buckets[11].key, "2024-12");
    }

    #[test]
    fn test_monthly_aggregate_by_category() {
        let records = sample();
        let only = CategoryFilter::Only("交通".to_string());
        let buckets = aggregate_on(&records, Granularity::Monthly, &only, day(2024, 6, 1));
        assert_eq!(buckets[0].total, 5.0);
        assert_eq!(buckets[1].total, 0.0);
    }

    #[test]
    fn test_daily_aggregate_most_recent_first() {
        let records = vec![
            rec("2024-03-01", "吃饭", "", 4.0),
            rec("2024-02-29", "吃饭", "", 6.0),
            rec("2024-02-10", "吃饭", "", 100.0),
        ];
        let buckets = aggregate_on(&records, Granularity::Daily, &CategoryFilter::All, day(2024, 3, 1));

        assert_eq!(buckets.len(), 20);
        assert_eq!(buckets[0].label, "03-01");
        assert_eq!(buckets[0].total, 4.0);
        assert_eq!(buckets[1].label, "02-29");
        assert_eq!(buckets[1].total, 6.0);
        assert_eq!(buckets[19].key, "2024-02-11");
        let sum: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(sum, 10.0);
    }

    #[test]
    fn test_yearly_aggregate_most_recent_first() {
        let records = vec![
            rec("2024-05-01", "房租", "", 1000.0),
            rec("2015-05-01", "房租", "", 800.0),
            rec("2014-05-01", "房租", "", 700.0),
        ];
        let buckets = aggregate_on(&records, Granularity::Yearly, &CategoryFilter::All, day(2024, 7, 1));

        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels[0], "2024");
        assert_eq!(labels[9], "2015");
        assert_eq!(buckets[0].total, 1000.0);
        assert_eq!(buckets[9].total, 800.0);
    }

    #[test]
    fn test_aggregate_is_dense_on_empty_input() {
        for granularity in [Granularity::Monthly, Granularity::Daily, Granularity::Yearly] {
            let buckets = aggregate_on(&[], granularity, &CategoryFilter::All, day(2024, 1, 1));
            assert_eq!(buckets.len(), granularity.bucket_count());
            assert!(buckets.iter().all(|b| b.total == 0.0));
        }
    }
}
