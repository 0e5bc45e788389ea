// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use ministry_scheduler::config::{ConfigError, ConfigResult, GenerationOptions, OptionsReader};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock 配置结构
///
/// 记录读取次数; broken=true 时模拟配置存储故障
#[derive(Debug, Default)]
pub struct MockConfig {
    pub options: GenerationOptions,
    pub broken: bool,
    loads: AtomicUsize,
}

impl MockConfig {
    pub fn with_options(options: GenerationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// 读取即失败的配置源
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OptionsReader for MockConfig {
    async fn load_generation_options(&self) -> ConfigResult<GenerationOptions> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(ConfigError::Storage("mock storage offline".to_string()));
        }
        self.options.validate()?;
        Ok(self.options.clone())
    }
}
