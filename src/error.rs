//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum GuardError {
    // 校验相关错误
    #[error("提取码格式无效：{0:?}")]
    InvalidCodeFormat(String),

    // 编译相关错误
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),

    // 配置相关错误
    #[error("配置无效：{0}")]
    ConfigError(String),
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 页面相关错误
    #[error("表单不存在：#{0}")]
    FormNotFound(usize),
    #[error("元素不存在：id={0}")]
    ElementNotFound(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type GuardResult<T> = Result<T, GuardError>;
