//! 提示通道：替代浏览器的阻塞式 alert

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::warn;

/// 校验失败提示接口
pub trait Notifier {
    fn report_invalid_input(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn report_invalid_input(&self, message: &str) {
        (**self).report_invalid_input(message)
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn report_invalid_input(&self, message: &str) {
        (**self).report_invalid_input(message)
    }
}

/// 以 warn 日志输出提示
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report_invalid_input(&self, message: &str) {
        warn!("{}", message);
    }
}

/// 按顺序记录所有提示
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// 取出并清空
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

impl Notifier for RecordingNotifier {
    fn report_invalid_input(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_through_rc() {
        let recorder = Rc::new(RecordingNotifier::new());
        let shared: Rc<dyn Notifier> = recorder.clone();

        shared.report_invalid_input("第一条");
        shared.report_invalid_input("第二条");

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.messages(), vec!["第一条".to_string(), "第二条".to_string()]);
        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.is_empty());
    }
}
