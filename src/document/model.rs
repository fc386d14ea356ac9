//! 页面数据模型
//! 解析完成的文档：表单、带id元素、输入值、焦点与提交事件分发

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use super::html_parser::FormExtractor;
use super::interface::{InputField, SubmitEvent, SubmitListener, SubmitOutcome};
use crate::error::{GuardError, GuardResult};

/// 表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormElement {
    pub index: usize,
    pub id: Option<String>,
    pub action: Option<String>,
    pub method: Option<String>,
    // 表单内控件在 Document::elements 中的下标
    pub controls: Vec<usize>,
}

/// 页面元素
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub name: Option<String>,
    // 所属表单下标
    pub form: Option<usize>,
    value: RefCell<String>,
}

impl Element {
    pub(crate) fn new(
        tag: &str,
        id: Option<String>,
        name: Option<String>,
        form: Option<usize>,
        value: String,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            id,
            name,
            form,
            value: RefCell::new(value),
        }
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    pub(crate) fn append_value(&self, text: &str) {
        self.value.borrow_mut().push_str(text);
    }

    pub(crate) fn replace_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }
}

/// 解析完成的页面
#[derive(Default)]
pub struct Document {
    forms: Vec<FormElement>,
    elements: Vec<Element>,
    focused: Cell<Option<usize>>,
    listeners: RefCell<Vec<Vec<Rc<dyn SubmitListener>>>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("forms", &self.forms)
            .field("elements", &self.elements)
            .field("focused", &self.focused.get())
            .field(
                "listeners",
                &self.listeners.borrow().iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Document {
    /// 解析HTML；返回时页面结构已完整可用
    pub fn parse(html: &str) -> Self {
        let (forms, elements) = FormExtractor::extract(html);
        debug!("页面解析完成，表单数：{}，元素数：{}", forms.len(), elements.len());

        let listeners = RefCell::new(vec![Vec::new(); forms.len()]);
        Self {
            forms,
            elements,
            focused: Cell::new(None),
            listeners,
        }
    }

    /// 从本地文件加载页面
    pub fn from_file<P: AsRef<Path>>(path: P) -> GuardResult<Self> {
        let html = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::parse(&html))
    }

    pub fn forms(&self) -> &[FormElement] {
        &self.forms
    }

    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    pub fn form(&self, index: usize) -> Option<&FormElement> {
        self.forms.get(index)
    }

    pub fn form_by_id(&self, id: &str) -> Option<&FormElement> {
        self.forms.iter().find(|f| f.id.as_deref() == Some(id))
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// 按 id 查找（文档顺序第一个，等价 getElementById）
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .map(|index| ElementRef { document: self, index })
    }

    /// 仅在指定表单的控件中按 id 查找
    pub fn element_in_form(&self, form: usize, id: &str) -> Option<ElementRef<'_>> {
        let form = self.forms.get(form)?;
        form.controls
            .iter()
            .copied()
            .find(|&i| self.elements[i].id.as_deref() == Some(id))
            .map(|index| ElementRef { document: self, index })
    }

    /// 模拟用户输入
    pub fn set_value(&self, id: &str, value: &str) -> GuardResult<()> {
        let element = self
            .element_by_id(id)
            .ok_or_else(|| GuardError::ElementNotFound(id.to_string()))?;
        self.elements[element.index].replace_value(value);
        Ok(())
    }

    pub fn value_of(&self, id: &str) -> Option<String> {
        self.element_by_id(id).map(|e| e.value())
    }

    /// 当前获得焦点的元素 id
    pub fn focused_id(&self) -> Option<&str> {
        self.focused
            .get()
            .and_then(|i| self.elements.get(i))
            .and_then(|e| e.id.as_deref())
    }

    /// 注册提交监听器；同名监听器已存在时返回 false
    pub fn add_submit_listener(
        &self,
        form: usize,
        listener: Rc<dyn SubmitListener>,
    ) -> GuardResult<bool> {
        let mut listeners = self.listeners.borrow_mut();
        let slot = listeners.get_mut(form).ok_or(GuardError::FormNotFound(form))?;
        if slot.iter().any(|l| l.name() == listener.name()) {
            return Ok(false);
        }
        slot.push(listener);
        Ok(true)
    }

    pub fn listener_count(&self, form: usize) -> usize {
        self.listeners.borrow().get(form).map_or(0, Vec::len)
    }

    /// 提交表单：依次触发监听器，任一监听器取消默认行为则提交被取消
    pub fn submit(&self, form: usize) -> GuardResult<SubmitOutcome> {
        // 拷贝一份，允许监听器在回调中继续注册
        let listeners = self
            .listeners
            .borrow()
            .get(form)
            .cloned()
            .ok_or(GuardError::FormNotFound(form))?;

        let mut event = SubmitEvent::new(form);
        for listener in &listeners {
            listener.on_submit(&mut event, self);
        }

        let outcome = if event.default_prevented() {
            SubmitOutcome::Cancelled
        } else {
            SubmitOutcome::Submitted
        };
        debug!("表单#{}提交结果：{}", form, outcome.as_str());
        Ok(outcome)
    }
}

/// 元素引用，作为 InputField 交给守卫
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    document: &'a Document,
    index: usize,
}

impl<'a> ElementRef<'a> {
    pub fn element(&self) -> &'a Element {
        &self.document.elements[self.index]
    }
}

impl InputField for ElementRef<'_> {
    fn id(&self) -> Option<&str> {
        self.element().id.as_deref()
    }

    fn value(&self) -> String {
        self.element().value()
    }

    fn focus(&self) {
        self.document.focused.set(Some(self.index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Veto;

    impl SubmitListener for Veto {
        fn name(&self) -> &str {
            "veto"
        }

        fn on_submit(&self, event: &mut SubmitEvent, _document: &Document) {
            event.prevent_default();
        }
    }

    const PAGE: &str = r#"
        <p id="hint">请输入提取码</p>
        <form id="fetch"><input id="code" value="abc"></form>
        <form id="other"><input id="code" value="second"></form>
    "#;

    #[test]
    fn test_element_by_id_returns_first_match() {
        let doc = Document::parse(PAGE);
        let code = doc.element_by_id("code").unwrap();
        assert_eq!(code.value(), "abc");
        assert_eq!(code.element().form, Some(0));
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_element_in_form() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.element_in_form(1, "code").unwrap().value(), "second");
        assert!(doc.element_in_form(0, "hint").is_none());
        assert!(doc.element_in_form(9, "code").is_none());
        assert_eq!(doc.form_by_id("other").map(|f| f.index), Some(1));
    }

    #[test]
    fn test_set_value_and_focus() {
        let doc = Document::parse(PAGE);
        doc.set_value("code", "ZZ9988").unwrap();
        assert_eq!(doc.value_of("code").as_deref(), Some("ZZ9988"));

        assert_eq!(doc.focused_id(), None);
        doc.element_by_id("hint").unwrap().focus();
        assert_eq!(doc.focused_id(), Some("hint"));

        let err = doc.set_value("nope", "x").unwrap_err();
        assert!(matches!(err, GuardError::ElementNotFound(ref id) if id == "nope"));
    }

    #[test]
    fn test_submit_without_listeners() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.submit(0).unwrap(), SubmitOutcome::Submitted);
        assert!(matches!(doc.submit(2), Err(GuardError::FormNotFound(2))));
    }

    #[test]
    fn test_listener_dedup_and_cancel() {
        let doc = Document::parse(PAGE);
        assert!(doc.add_submit_listener(0, Rc::new(Veto)).unwrap());
        assert!(!doc.add_submit_listener(0, Rc::new(Veto)).unwrap());
        assert_eq!(doc.listener_count(0), 1);
        assert!(doc.add_submit_listener(5, Rc::new(Veto)).is_err());

        assert_eq!(doc.submit(0).unwrap(), SubmitOutcome::Cancelled);
        assert_eq!(doc.submit(1).unwrap(), SubmitOutcome::Submitted);
    }
}
