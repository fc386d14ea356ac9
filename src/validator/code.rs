//! 提取码值类型
//! 只有通过校验的输入才能得到 ExtractionCode

use std::fmt;
use std::str::FromStr;

use crate::error::GuardError;
use super::pattern::CodeValidator;

/// 去除首尾空白（与浏览器 String.prototype.trim 一致）
#[inline]
pub fn trim_input(raw: &str) -> &str {
    raw.trim_matches(is_js_whitespace)
}

/// JS 空白：Zs 空白 + 行终止符 + BOM；U+0085(NEL) 不算
#[inline]
fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// 已通过校验的提取码（6位字母数字，保留大小写）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractionCode(String);

impl ExtractionCode {
    /// 仅供校验器在匹配成功后构造
    pub(crate) fn new_unchecked(code: &str) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ExtractionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ExtractionCode {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeValidator::default().check(s)
    }
}
