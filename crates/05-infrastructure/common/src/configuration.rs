//! 容器配置
//!
//! 容器的构建期选项，可以直接构造，也可以通过 `config` crate 从配置文件和环境变量绑定。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 依赖注入容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// 容器名称，用于日志
    pub name: String,
    /// 是否输出详细的扫描和注入日志
    pub verbose: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            name: "core".to_string(),
            verbose: false,
        }
    }
}

impl ContextConfig {
    /// 配置路径
    pub const CONFIG_PATH: &'static str = "context";

    /// 环境变量前缀
    pub const ENV_PREFIX: &'static str = "ADSP";

    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置容器名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置详细日志
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 从默认配置源加载
    ///
    /// 依次读取 `config/app`、`config/local`（均可选）和 `ADSP_` 前缀的环境变量，
    /// 例如 `ADSP_CONTEXT_VERBOSE=true`。
    pub fn load() -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/app").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix(Self::ENV_PREFIX).separator("_"))
            .build()?;

        Self::from_settings(&settings)
    }

    /// 从指定配置文件加载，格式由扩展名决定
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("加载容器配置文件: {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        Self::from_settings(&settings)
    }

    /// 从已构建的配置中绑定 `context` 节，缺失时使用默认值
    pub fn from_settings(settings: &config::Config) -> ConfigResult<Self> {
        let config = match settings.get::<Self>(Self::CONFIG_PATH) {
            Ok(config) => config,
            Err(config::ConfigError::NotFound(_)) => {
                debug!("未找到配置节 '{}'，使用默认容器配置", Self::CONFIG_PATH);
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };

        config.validate()?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "容器名称不能为空".to_string(),
            });
        }
        Ok(())
    }
}
