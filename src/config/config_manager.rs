// ==========================================
// 周中聚会节目派工系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载生成选项默认值
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::generation_options::GenerationOptions;
use crate::config::options_reader::OptionsReader;
use crate::db::open_sqlite_connection;
use crate::domain::member::MemberId;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const PRIORITIZE_NEW: &str = "generation.prioritize_new";
    pub const ALLOW_REPEAT_IN_WEEK: &str = "generation.allow_repeat_in_week";
    pub const HISTORY_WINDOW_WEEKS: &str = "generation.history_window_weeks";
    pub const EXCLUDED_MEMBER_IDS: &str = "generation.excluded_member_ids";
    pub const MINORS_SAME_GENDER_ONLY: &str = "generation.minors_same_gender_only";
    pub const MINOR_AGE_THRESHOLD: &str = "generation.minor_age_threshold";
    pub const GENDER_SKEW_THRESHOLD: &str = "generation.gender_skew_threshold";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_bool(&self, key: &str, default: bool) -> ConfigResult<bool> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "y" | "on" => Ok(true),
                "0" | "false" | "no" | "n" | "off" => Ok(false),
                _ => Err(invalid(key, &raw)),
            },
        }
    }

    fn get_u32(&self, key: &str, default: u32) -> ConfigResult<u32> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| invalid(key, &raw)),
        }
    }

    fn get_f64(&self, key: &str, default: f64) -> ConfigResult<f64> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| invalid(key, &raw)),
        }
    }

    /// 逗号分隔的成员 id 列表
    fn get_member_ids(&self, key: &str) -> ConfigResult<BTreeSet<MemberId>> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(BTreeSet::new());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u64>()
                    .map(MemberId)
                    .map_err(|_| invalid(key, &raw))
            })
            .collect()
    }
}

fn invalid(key: &str, raw: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("无法解析: {}", raw),
    }
}

// ==========================================
// OptionsReader Trait 实现
// ==========================================
#[async_trait]
impl OptionsReader for ConfigManager {
    async fn load_generation_options(&self) -> ConfigResult<GenerationOptions> {
        let defaults = GenerationOptions::default();

        let options = GenerationOptions {
            prioritize_new: self.get_bool(config_keys::PRIORITIZE_NEW, defaults.prioritize_new)?,
            allow_repeat_in_week: self
                .get_bool(config_keys::ALLOW_REPEAT_IN_WEEK, defaults.allow_repeat_in_week)?,
            history_window_weeks: self
                .get_u32(config_keys::HISTORY_WINDOW_WEEKS, defaults.history_window_weeks)?,
            excluded_member_ids: self.get_member_ids(config_keys::EXCLUDED_MEMBER_IDS)?,
            minors_same_gender_only: self.get_bool(
                config_keys::MINORS_SAME_GENDER_ONLY,
                defaults.minors_same_gender_only,
            )?,
            minor_age_threshold: self
                .get_u32(config_keys::MINOR_AGE_THRESHOLD, defaults.minor_age_threshold)?,
            gender_skew_threshold: self
                .get_f64(config_keys::GENDER_SKEW_THRESHOLD, defaults.gender_skew_threshold)?,
        };

        options.validate()?;
        tracing::debug!(?options, "已加载生成选项");
        Ok(options)
    }
}
