//! 提取码正则模型
//! 默认规则全局只编译一次

use once_cell::sync::Lazy;
use regex::Regex;

use super::code::{ExtractionCode, trim_input};
use crate::config::{DEFAULT_CODE_PATTERN, GuardConfig};
use crate::error::{GuardError, GuardResult};

/// 默认规则（^[A-Za-z0-9]{6}$）的全局编译结果
static DEFAULT_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_CODE_PATTERN).unwrap_or_else(|e| panic!("内置提取码正则无效：{}", e))
});

/// 提取码校验器
#[derive(Debug, Clone)]
pub struct CodeValidator {
    regex: Regex,
}

impl Default for CodeValidator {
    fn default() -> Self {
        Self {
            regex: DEFAULT_CODE_REGEX.clone(),
        }
    }
}

impl CodeValidator {
    /// 用自定义正则创建校验器
    pub fn new(pattern: &str) -> GuardResult<Self> {
        if pattern == DEFAULT_CODE_PATTERN {
            return Ok(Self::default());
        }
        let regex = Regex::new(pattern)?;
        Ok(Self { regex })
    }

    /// 按配置创建校验器
    pub fn from_config(config: &GuardConfig) -> GuardResult<Self> {
        Self::new(&config.pattern)
    }

    /// 简单匹配判断（先 trim）
    pub fn is_match(&self, raw: &str) -> bool {
        self.regex.is_match(trim_input(raw))
    }

    /// 校验并返回提取码
    pub fn check(&self, raw: &str) -> GuardResult<ExtractionCode> {
        let code = trim_input(raw);
        if self.regex.is_match(code) {
            Ok(ExtractionCode::new_unchecked(code))
        } else {
            Err(GuardError::InvalidCodeFormat(code.to_string()))
        }
    }

    /// 规则描述
    pub fn describe(&self) -> &str {
        self.regex.as_str()
    }
}
