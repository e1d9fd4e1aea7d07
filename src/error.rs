use std::path::PathBuf;

use thiserror::Error;

/// 记录文件读写失败
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("读写 {path} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} 不是有效的记录文件: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("记录序号 {index} 超出范围（共 {len} 条）")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("金额无效: {0}")]
    InvalidAmount(f64),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}

/// 用户输入校验失败，消息直接展示给用户
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("请输入金额")]
    EmptyAmount,
    #[error("金额必须是数字")]
    InvalidAmount,
    #[error("金额必须大于0")]
    NonPositiveAmount,
    #[error("请输入年份")]
    MissingYear,
    #[error("请输入月份")]
    MissingMonth,
    #[error("请输入日期")]
    MissingDay,
    #[error("年份必须是4位数字")]
    InvalidYear,
    #[error("月份必须在1到12之间")]
    MonthOutOfRange,
    #[error("日期超出该月范围")]
    DayOutOfRange,
    #[error("未知分类: {0}")]
    UnknownCategory(String),
}
