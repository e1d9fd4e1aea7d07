use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE: &str = "zhangben.log";

/// 把日志追加写入 `data_dir/zhangben.log`。
///
/// `RUST_LOG` 优先于 `level`。
pub fn init_logging(data_dir: &Path, level: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let default_filter = format!("zhangben={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();
    if let Err(e) = initialized {
        return Err(std::io::Error::other(e));
    }

    tracing::info!("logging initialized (log_path={})", log_path.display());
    Ok(log_path)
}
