//! 页面交互接口：提交事件与输入框抽象

use super::model::Document;

/// 输入框抽象，守卫只通过它读取值和转移焦点
pub trait InputField {
    /// 元素 id
    fn id(&self) -> Option<&str>;
    /// 当前文本值
    fn value(&self) -> String;
    /// 设置键盘焦点
    fn focus(&self);
}

/// 表单提交事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    form: usize,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: usize) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    /// 触发事件的表单下标
    pub fn form(&self) -> usize {
        self.form
    }

    /// 取消默认提交行为
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 表单正常提交
    Submitted,
    /// 提交被监听器取消
    Cancelled,
}

impl SubmitOutcome {
    pub fn is_submitted(self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmitOutcome::Submitted => "submitted",
            SubmitOutcome::Cancelled => "cancelled",
        }
    }
}

/// 提交监听器
pub trait SubmitListener {
    /// 监听器名称，同一表单上同名监听器只注册一次
    fn name(&self) -> &str;

    /// 处理提交事件
    fn on_submit(&self, event: &mut SubmitEvent, document: &Document);
}
