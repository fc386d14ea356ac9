//! 页面模块：HTML解析后的表单结构与提交事件
mod html_parser;
pub mod interface;
pub mod model;

pub use self::interface::{InputField, SubmitEvent, SubmitListener, SubmitOutcome};
pub use self::model::{Document, Element, ElementRef, FormElement};
