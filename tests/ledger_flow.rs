use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;
use zhangben::query::{aggregate_on, filter_by_time_on};
use zhangben::{
    filter_by_time, search, total, CategoryFilter, Granularity, RecordStore, StoreError,
    TimeFilter,
};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn seeded_store(dir: &std::path::Path) -> RecordStore {
    let store = RecordStore::open(dir.join("advanced_account_records.json"));
    store.append_at(at(2024, 1, 1), "吃饭", "火锅", 10.0).unwrap();
    store.append_at(at(2024, 1, 1), "交通", "", 5.0).unwrap();
    store.append_at(at(2024, 2, 1), "购物", "键盘", 20.0).unwrap();
    store
}

#[test]
fn test_day_filter_and_monthly_statistics() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());
    let records = store.load().unwrap();

    let day = filter_by_time(&records, TimeFilter::ByDay, "2024-01-01");
    assert_eq!(day, records[..2]);
    assert_eq!(total(&day), 15.0);

    let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    let buckets = aggregate_on(&records, Granularity::Monthly, &CategoryFilter::All, today);
    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[0].total, 15.0);
    assert_eq!(buckets[1].total, 20.0);
    assert!(buckets[2..].iter().all(|b| b.total == 0.0));
}

#[test]
fn test_all_filter_and_empty_search_leave_snapshot_unchanged() {
    let dir = tempdir().unwrap();
    let records = seeded_store(dir.path()).load().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();

    let all = filter_by_time_on(&records, TimeFilter::All, "", today);
    assert_eq!(total(&all), total(&records));
    assert_eq!(search(&records, ""), records);

    let hits = search(&records, "键");
    assert!(hits
        .iter()
        .all(|r| r.category.contains("键") || r.remark.contains("键")));
    assert_eq!(hits.len(), 1);
}

#[test]
fn test_delete_then_reload_reflects_change() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());

    store.delete_at(0).unwrap();
    let records = store.load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].category, "交通");
    assert_eq!(records[1].category, "购物");

    assert!(matches!(
        store.delete_at(2),
        Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert_eq!(store.load().unwrap(), records);
}
