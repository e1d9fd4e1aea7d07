use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::StoreError;
use crate::record::{is_valid_amount, Record};

/// 以单个 JSON 数组文件保存的记录集合。
///
/// 每次修改都整体读出、整体写回，顺序即录入顺序（最新在末尾）。
/// 单进程单用户使用，不加锁。
pub struct RecordStore {
    path: PathBuf,
}

/// 一次读取的结果：合法记录和被拒绝的原始条目
struct Snapshot {
    records: Vec<Record>,
    rejected: Vec<Value>,
}

impl RecordStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::open(config.data_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 被拒绝条目的隔离文件，与数据文件同目录
    pub fn quarantine_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records".to_string());
        self.path.with_file_name(format!("{stem}.rejected.json"))
    }

    /// 读取全部记录；文件不存在时先创建空数组文件。
    pub fn load(&self) -> Result<Vec<Record>, StoreError> {
        self.read_snapshot().map(|s| s.records)
    }

    /// 以当前本地时间追加一条记录
    pub fn append(&self, category: &str, remark: &str, amount: f64) -> Result<Record, StoreError> {
        self.append_at(Local::now().naive_local(), category, remark, amount)
    }

    pub fn append_at(
        &self,
        at: NaiveDateTime,
        category: &str,
        remark: &str,
        amount: f64,
    ) -> Result<Record, StoreError> {
        let checked = if is_valid_amount(amount) {
            Ok(amount)
        } else {
            Err(StoreError::InvalidAmount(amount))
        };
        let result = checked.and_then(|amount| {
            let mut snapshot = self.read_snapshot()?;
            let record = Record::new(at, category, remark, amount);
            snapshot.records.push(record.clone());
            self.write_snapshot(&snapshot)?;
            Ok(record)
        });

        match &result {
            Ok(record) => tracing::info!(
                "appended record: {} {} {:.2}",
                record.time,
                record.category,
                record.amount
            ),
            Err(e) => tracing::error!("failed to append record: {e}"),
        }
        result
    }

    /// 删除集合中第 `index` 条（从最旧的记录数起，不是界面上的倒序位置）
    pub fn delete_at(&self, index: usize) -> Result<Record, StoreError> {
        let result = self.read_snapshot().and_then(|mut snapshot| {
            let len = snapshot.records.len();
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
            let removed = snapshot.records.remove(index);
            self.write_snapshot(&snapshot)?;
            Ok(removed)
        });

        match &result {
            Ok(record) => tracing::info!("deleted record #{index}: {}", record.time),
            Err(e) => tracing::error!("failed to delete record #{index}: {e}"),
        }
        result
    }

    fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }
        fs::write(&self.path, "[]").map_err(|e| StoreError::io(&self.path, e))?;
        tracing::info!("created empty record file {}", self.path.display());
        Ok(())
    }

    fn read_snapshot(&self) -> Result<Snapshot, StoreError> {
        self.ensure_exists()?;
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let entries: Vec<Value> =
            serde_json::from_str(&text).map_err(|e| StoreError::json(&self.path, e))?;

        let mut records = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();
        for (i, entry) in entries.into_iter().enumerate() {
            match Record::from_stored(&entry) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    tracing::warn!("skipping stored entry #{i}: {reason}");
                    rejected.push(entry);
                }
            }
        }

        tracing::debug!(
            "loaded {} records from {} ({} rejected)",
            records.len(),
            self.path.display(),
            rejected.len()
        );
        Ok(Snapshot { records, rejected })
    }

    /// 数据文件写成功后才隔离被拒绝的条目，写失败时它们仍留在数据文件里
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&snapshot.records)
            .map_err(|e| StoreError::json(&self.path, e))?;
        atomic_write(&self.path, &json)?;
        if !snapshot.rejected.is_empty() {
            self.quarantine(&snapshot.rejected)?;
        }
        Ok(())
    }

    /// 把被拒绝的条目追加进隔离文件
    fn quarantine(&self, entries: &[Value]) -> Result<(), StoreError> {
        let path = self.quarantine_path();
        let mut kept: Vec<Value> = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| StoreError::json(&path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        kept.extend_from_slice(entries);

        let json = serde_json::to_string_pretty(&kept).map_err(|e| StoreError::json(&path, e))?;
        atomic_write(&path, &json)?;
        tracing::warn!(
            "moved {} malformed entries to {}",
            entries.len(),
            path.display()
        );
        Ok(())
    }
}

/// 先写临时文件再改名，写入中途退出不会留下半个文件
fn atomic_write(path: &Path, content: &str) -> Result<(), StoreError> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(|e| StoreError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| StoreError::io(path, e))
}
