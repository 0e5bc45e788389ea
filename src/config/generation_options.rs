// ==========================================
// 周中聚会节目派工系统 - 生成选项
// ==========================================
// 职责: 一次生成的全部开关,贯穿所有引擎调用
// 说明: 兼容旧系统的 priorizar_novos / permitir_consecutivas 键名
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::member::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_HISTORY_WINDOW_WEEKS: u32 = 8;
pub const DEFAULT_MINOR_AGE_THRESHOLD: u32 = 18;
pub const DEFAULT_GENDER_SKEW_THRESHOLD: f64 = 0.8;
/// 回看窗口上限（约十年）
pub const MAX_HISTORY_WINDOW_WEEKS: u32 = 520;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// 优先从未派工过的成员
    #[serde(alias = "priorizar_novos")]
    pub prioritize_new: bool,

    /// 允许同一成员一周内多次出现
    #[serde(alias = "permitir_consecutivas")]
    pub allow_repeat_in_week: bool,

    /// 频次统计回看窗口（周）
    pub history_window_weeks: u32,

    /// 本周预先排除的成员（视为已占用）
    pub excluded_member_ids: BTreeSet<MemberId>,

    /// 未成年人只能同性搭档（即使同一家庭）
    pub minors_same_gender_only: bool,

    pub minor_age_threshold: u32,

    /// 单一性别占比超过该阈值时提示性别失衡
    pub gender_skew_threshold: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            prioritize_new: false,
            allow_repeat_in_week: false,
            history_window_weeks: DEFAULT_HISTORY_WINDOW_WEEKS,
            excluded_member_ids: BTreeSet::new(),
            minors_same_gender_only: false,
            minor_age_threshold: DEFAULT_MINOR_AGE_THRESHOLD,
            gender_skew_threshold: DEFAULT_GENDER_SKEW_THRESHOLD,
        }
    }
}

impl GenerationOptions {
    pub fn with_prioritize_new(mut self, value: bool) -> Self {
        self.prioritize_new = value;
        self
    }

    pub fn with_allow_repeat_in_week(mut self, value: bool) -> Self {
        self.allow_repeat_in_week = value;
        self
    }

    pub fn with_excluded(mut self, ids: impl IntoIterator<Item = MemberId>) -> Self {
        self.excluded_member_ids.extend(ids);
        self
    }

    /// 校验选项取值
    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_window_weeks == 0 || self.history_window_weeks > MAX_HISTORY_WINDOW_WEEKS {
            return Err(ConfigError::InvalidValue {
                key: "historyWindowWeeks".to_string(),
                message: format!(
                    "取值 {} 不在 [1, {}] 区间",
                    self.history_window_weeks, MAX_HISTORY_WINDOW_WEEKS
                ),
            });
        }

        let skew = self.gender_skew_threshold;
        if !skew.is_finite() || skew <= 0.5 || skew > 1.0 {
            return Err(ConfigError::InvalidValue {
                key: "genderSkewThreshold".to_string(),
                message: format!("取值 {} 不在 (0.5, 1.0] 区间", skew),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = GenerationOptions::default();
        assert!(options.validate().is_ok());
        assert!(!options.prioritize_new);
        assert!(!options.allow_repeat_in_week);
        assert_eq!(options.history_window_weeks, 8);
    }

    #[test]
    fn test_legacy_key_aliases() {
        let json = r#"{"priorizar_novos": true, "permitir_consecutivas": true}"#;
        let options: GenerationOptions = serde_json::from_str(json).unwrap();
        assert!(options.prioritize_new);
        assert!(options.allow_repeat_in_week);
        assert_eq!(options.minor_age_threshold, 18);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut options = GenerationOptions::default();
        options.history_window_weeks = 0;
        assert!(options.validate().is_err());
        options.history_window_weeks = 20_000_000;
        assert!(options.validate().is_err());
        options.history_window_weeks = MAX_HISTORY_WINDOW_WEEKS;
        assert!(options.validate().is_ok());

        let mut options = GenerationOptions::default();
        options.gender_skew_threshold = 0.4;
        assert!(options.validate().is_err());

        options.gender_skew_threshold = 1.0;
        assert!(options.validate().is_ok());
    }
}
