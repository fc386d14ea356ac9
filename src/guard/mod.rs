//! 守卫模块：表单提交拦截与失败提示
pub mod notifier;
pub mod form_guard;

pub use self::notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use self::form_guard::{FormGuard, GUARD_LISTENER_NAME};
