//! 个人支出记账本的数据层：记录存储与查询统计。

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod query;
pub mod record;
pub mod store;

pub use config::AppConfig;
pub use error::{StoreError, ValidationError};
pub use logging::init_logging;
pub use query::{
    aggregate, category_totals, filter_by_time, search, total, Bucket, CategoryFilter,
    Granularity, QuerySpec, TimeFilter,
};
pub use record::Record;
pub use store::RecordStore;
