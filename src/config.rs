//! 全局配置管理,存储守卫的所有可配置项

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GuardError, GuardResult};

/// 默认校验的输入框 id
pub const DEFAULT_FIELD_ID: &str = "code";
/// 默认提取码规则：6位字母数字，区分大小写
pub const DEFAULT_CODE_PATTERN: &str = r"^[A-Za-z0-9]{6}$";
/// 校验失败时的提示语
pub const DEFAULT_INVALID_MESSAGE: &str = "提取码必须是6位字母和数字组合（区分大小写）";

/// 输入框查找范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupScope {
    /// 整个页面中查找（等价 getElementById）
    #[default]
    Document,
    /// 仅在被提交的表单内查找
    Form,
}

impl std::str::FromStr for LookupScope {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(LookupScope::Document),
            "form" => Ok(LookupScope::Form),
            other => Err(GuardError::ConfigError(format!("未知的查找范围：{}", other))),
        }
    }
}

/// 守卫配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    // 被校验输入框的 id
    pub field_id: String,
    // 提取码正则
    pub pattern: String,
    // 校验失败提示语
    pub message: String,
    // 输入框查找范围
    pub lookup_scope: LookupScope,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            field_id: DEFAULT_FIELD_ID.to_string(),
            pattern: DEFAULT_CODE_PATTERN.to_string(),
            message: DEFAULT_INVALID_MESSAGE.to_string(),
            lookup_scope: LookupScope::Document,
            verbose: false,
        }
    }
}

impl GuardConfig {
    /// 基础合法性检查（正则本身在构建校验器时编译）
    pub fn check(&self) -> GuardResult<()> {
        if self.field_id.trim().is_empty() {
            return Err(GuardError::ConfigError("field_id 不能为空".to_string()));
        }
        if self.pattern.is_empty() {
            return Err(GuardError::ConfigError("pattern 不能为空".to_string()));
        }
        Ok(())
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GuardConfig {
        GuardConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }

    /// 从JSON字符串加载配置，缺失字段使用默认值
    pub fn from_json_str(json: &str) -> GuardResult<GuardConfig> {
        let config: GuardConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> GuardResult<GuardConfig> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GuardConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_id(mut self, field_id: impl Into<String>) -> Self {
        self.config.field_id = field_id.into();
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.config.message = message.into();
        self
    }

    pub fn lookup_scope(mut self, scope: LookupScope) -> Self {
        self.config.lookup_scope = scope;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> GuardConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert_eq!(config.field_id, "code");
        assert_eq!(config.pattern, r"^[A-Za-z0-9]{6}$");
        assert_eq!(config.message, "提取码必须是6位字母和数字组合（区分大小写）");
        assert_eq!(config.lookup_scope, LookupScope::Document);
        assert!(!config.verbose);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigManager::custom()
            .field_id("pickup")
            .lookup_scope(LookupScope::Form)
            .verbose(true)
            .build();

        assert_eq!(config.field_id, "pickup");
        assert_eq!(config.lookup_scope, LookupScope::Form);
        assert!(config.verbose);
        // 未覆盖的字段保持默认
        assert_eq!(config.pattern, DEFAULT_CODE_PATTERN);
    }

    #[test]
    fn test_json_partial_config() {
        let config = ConfigManager::from_json_str(r#"{"lookup_scope": "form"}"#).unwrap();
        assert_eq!(config.lookup_scope, LookupScope::Form);
        assert_eq!(config.field_id, DEFAULT_FIELD_ID);
        assert_eq!(config.message, DEFAULT_INVALID_MESSAGE);
    }

    #[test]
    fn test_json_rejects_empty_field_id() {
        let err = ConfigManager::from_json_str(r#"{"field_id": "  "}"#).unwrap_err();
        assert!(matches!(err, GuardError::ConfigError(_)));
    }

    #[test]
    fn test_json_rejects_malformed() {
        let err = ConfigManager::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, GuardError::JsonError(_)));
    }

    #[test]
    fn test_lookup_scope_from_str() {
        assert_eq!("Document".parse::<LookupScope>().unwrap(), LookupScope::Document);
        assert_eq!(" form ".parse::<LookupScope>().unwrap(), LookupScope::Form);
        assert!("page".parse::<LookupScope>().is_err());
    }
}
