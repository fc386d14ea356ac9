//! 校验模块：提取码规则编译与匹配
pub mod pattern;
pub mod code;

pub use self::pattern::CodeValidator;
pub use self::code::{ExtractionCode, trim_input};
