// ==========================================
// 周中聚会节目派工系统 - 生成选项读取 Trait
// ==========================================
// 职责: 定义编排器所需的配置读取接口（不包含实现）
// 实现者: ConfigManager（config_kv 表）/ GenerationOptions（固定值）
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::generation_options::GenerationOptions;
use async_trait::async_trait;

#[async_trait]
pub trait OptionsReader: Send + Sync {
    /// 读取默认生成选项
    ///
    /// # 返回
    /// - 已通过 validate() 的 GenerationOptions
    async fn load_generation_options(&self) -> ConfigResult<GenerationOptions>;
}

// 固定选项: 测试与 CLI 直接传入
#[async_trait]
impl OptionsReader for GenerationOptions {
    async fn load_generation_options(&self) -> ConfigResult<GenerationOptions> {
        self.validate()?;
        Ok(self.clone())
    }
}
