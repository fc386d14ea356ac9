//! 表单守卫核心：拦截提交，校验提取码

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::notifier::{Notifier, TracingNotifier};
use crate::config::{GuardConfig, LookupScope};
use crate::document::{Document, ElementRef, InputField, SubmitEvent, SubmitListener};
use crate::error::GuardResult;
use crate::validator::{CodeValidator, ExtractionCode};

/// 守卫注册到表单上的监听器名称
pub const GUARD_LISTENER_NAME: &str = "rsformguard.code";

/// 表单守卫
pub struct FormGuard {
    config: GuardConfig,
    validator: CodeValidator,
    notifier: Box<dyn Notifier>,
}

impl fmt::Debug for FormGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormGuard")
            .field("config", &self.config)
            .field("pattern", &self.validator.describe())
            .finish_non_exhaustive()
    }
}

impl Default for FormGuard {
    fn default() -> Self {
        Self::with_notifier(TracingNotifier)
    }
}

impl FormGuard {
    /// 创建守卫
    pub fn new<N: Notifier + 'static>(config: GuardConfig, notifier: N) -> GuardResult<Self> {
        config.check()?;
        let validator = CodeValidator::from_config(&config)?;
        Ok(Self {
            config,
            validator,
            notifier: Box::new(notifier),
        })
    }

    /// 默认配置 + 指定提示通道
    pub fn with_notifier<N: Notifier + 'static>(notifier: N) -> Self {
        Self {
            config: GuardConfig::default(),
            validator: CodeValidator::default(),
            notifier: Box::new(notifier),
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// 给页面上所有表单挂载守卫，返回本次新挂载的表单数
    pub fn initialize(self: &Rc<Self>, document: &Document) -> GuardResult<usize> {
        let listener: Rc<dyn SubmitListener> = self.clone();
        let mut attached = 0;
        for form in document.forms() {
            if document.add_submit_listener(form.index, listener.clone())? {
                attached += 1;
            }
        }
        debug!(
            "表单守卫挂载完成，表单总数：{}，新挂载：{}",
            document.form_count(),
            attached
        );
        Ok(attached)
    }

    /// 校验输入框；输入框不存在视为通过
    pub fn validate(&self, field: Option<&dyn InputField>) -> bool {
        let Some(field) = field else {
            return true;
        };

        match self.check(&field.value()) {
            Ok(_) => true,
            Err(e) => {
                if self.config.verbose {
                    debug!("提取码校验失败，字段：{:?}，原因：{}", field.id(), e);
                }
                self.notifier.report_invalid_input(&self.config.message);
                field.focus();
                false
            }
        }
    }

    /// 纯校验，不产生副作用
    pub fn check(&self, raw: &str) -> GuardResult<ExtractionCode> {
        self.validator.check(raw)
    }

    /// 按查找范围定位被校验的输入框
    fn resolve_field<'d>(&self, document: &'d Document, form: usize) -> Option<ElementRef<'d>> {
        match self.config.lookup_scope {
            LookupScope::Document => document.element_by_id(&self.config.field_id),
            LookupScope::Form => document.element_in_form(form, &self.config.field_id),
        }
    }
}

impl SubmitListener for FormGuard {
    fn name(&self) -> &str {
        GUARD_LISTENER_NAME
    }

    fn on_submit(&self, event: &mut SubmitEvent, document: &Document) {
        let field = self.resolve_field(document, event.form());
        if !self.validate(field.as_ref().map(|f| f as &dyn InputField)) {
            event.prevent_default();
        }
    }
}
