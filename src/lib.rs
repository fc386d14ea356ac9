//! rsformguard - 表单提交守卫：提交前校验6位字母数字提取码

// 导出全局错误类型
pub use self::error::{GuardError, GuardResult};

// 导出配置模块
pub use self::config::{
    ConfigManager, CustomConfigBuilder, GuardConfig, LookupScope,
    DEFAULT_CODE_PATTERN, DEFAULT_FIELD_ID, DEFAULT_INVALID_MESSAGE,
};

// 导出校验模块核心接口
pub use self::validator::{CodeValidator, ExtractionCode};

// 导出页面模块核心接口
pub use self::document::{
    Document, Element, ElementRef, FormElement,
    InputField, SubmitEvent, SubmitListener, SubmitOutcome,
};

// 导出守卫模块核心接口
pub use self::guard::{FormGuard, Notifier, RecordingNotifier, TracingNotifier};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod validator;
pub mod document;
pub mod guard;
