// ==========================================
// 周中聚会节目派工系统 - 配置层
// ==========================================
// 职责: 生成选项定义 + 默认值加载
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod generation_options;
pub mod options_reader;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use generation_options::GenerationOptions;
pub use options_reader::OptionsReader;
