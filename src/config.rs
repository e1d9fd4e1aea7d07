use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_DATA_FILE: &str = "advanced_account_records.json";
pub const CONFIG_FILE: &str = "config.json";

/// 支出分类
pub const DEFAULT_CATEGORIES: [&str; 6] = ["购物", "吃饭", "房租", "交通", "礼物", "借钱"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub data_file: String,
    pub categories: Vec<String>,
    pub log_level: String,
}

/// `config.json` 中可覆盖的字段
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            data_file: DEFAULT_DATA_FILE.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn default_data_dir() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("zhangben");
        path
    }

    /// 读取 `data_dir/config.json`，缺失或无效时退回默认值
    pub fn load(data_dir: &Path) -> Self {
        let mut config = Self {
            data_dir: data_dir.to_path_buf(),
            ..Self::default()
        };

        let path = data_dir.join(CONFIG_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return config,
            Err(e) => {
                tracing::warn!("failed to read {}: {e}, using defaults", path.display());
                return config;
            }
        };

        let file: ConfigFile = match serde_json::from_str(&text) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("invalid {}: {e}, using defaults", path.display());
                return config;
            }
        };

        if let Some(categories) = file.categories {
            let categories: Vec<String> = categories
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if categories.is_empty() {
                tracing::warn!("empty category list in {}, using defaults", path.display());
            } else {
                config.categories = categories;
            }
        }
        if let Some(level) = file.log_level {
            config.log_level = level;
        }
        config
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(dir.path());
        assert_eq!(config.categories, DEFAULT_CATEGORIES);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_path(), dir.path().join(DEFAULT_DATA_FILE));
    }

    #[test]
    fn test_config_overrides_categories() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"categories": ["水果", " 零食 ", ""], "log_level": "debug"}"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path());
        assert_eq!(config.categories, ["水果", "零食"]);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_or_empty_config_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "not json").unwrap();
        assert_eq!(AppConfig::load(dir.path()).categories, DEFAULT_CATEGORIES);

        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"categories": []}"#).unwrap();
        assert_eq!(AppConfig::load(dir.path()).categories, DEFAULT_CATEGORIES);
    }
}
