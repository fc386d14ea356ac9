//! HTML表单提取器
//! 负责从HTML中提取form、表单控件以及带id的元素

use std::cell::{Cell, RefCell};
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts
};
use markup5ever::interface::Attribute;
use tendril::StrTendril;

use super::model::{Element, FormElement};

/// select 中的一个 option
#[derive(Debug, Default)]
struct OptionEntry {
    value: Option<String>,
    text: String,
    selected: bool,
}

impl OptionEntry {
    /// option 的值：value 属性，缺省时取压缩空白后的文本
    fn value(&self) -> String {
        match &self.value {
            Some(v) => v.clone(),
            None => self.text.split_ascii_whitespace().collect::<Vec<_>>().join(" "),
        }
    }
}

/// 正在解析的 select
#[derive(Debug)]
struct OpenSelect {
    index: usize,
    options: Vec<OptionEntry>,
    in_option: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FormExtractor {
    forms: RefCell<Vec<FormElement>>,
    elements: RefCell<Vec<Element>>,
    // 当前未闭合的 form 下标
    open_form: Cell<Option<usize>>,
    // 当前正在收集文本的 textarea 下标
    open_textarea: Cell<Option<usize>>,
    // textarea 起始换行需要丢弃
    textarea_fresh: Cell<bool>,
    open_select: RefCell<Option<OpenSelect>>,
    // template 内容不属于文档，getElementById 看不到
    template_depth: Cell<usize>,
}

impl TokenSink for FormExtractor {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(Tag {
                kind: TagKind::StartTag,
                name,
                attrs,
                ..
            }) => {
                return self.start_tag(name.as_ref(), &attrs);
            }
            Token::TagToken(Tag {
                kind: TagKind::EndTag,
                name,
                ..
            }) => self.end_tag(name.as_ref()),
            Token::CharacterTokens(text) if self.template_depth.get() == 0 => {
                self.push_textarea_text(&text);
                self.push_option_text(&text);
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl FormExtractor {
    /// 从HTML字符串提取表单结构
    pub(crate) fn extract(html: &str) -> (Vec<FormElement>, Vec<Element>) {
        let tokenizer = Tokenizer::new(Self::default(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        let sink = tokenizer.sink;
        // 未闭合的 select 同样要结算
        sink.close_select();
        (sink.forms.into_inner(), sink.elements.into_inner())
    }

    fn start_tag(&self, tag: &str, attrs: &[Attribute]) -> TokenSinkResult<()> {
        if tag == "template" {
            self.template_depth.set(self.template_depth.get() + 1);
            return TokenSinkResult::Continue;
        }
        if self.template_depth.get() > 0 {
            return raw_kind(tag).map_or(TokenSinkResult::Continue, TokenSinkResult::RawData);
        }

        match tag {
            "form" => {
                // 嵌套的 form 开始标签会被浏览器忽略
                if self.open_form.get().is_none() {
                    self.open_form_element(attrs);
                }
            }
            "input" | "textarea" | "select" | "button" => {
                if tag == "select" {
                    self.close_select();
                }
                let index = self.push_element(tag, attrs, true);
                match tag {
                    "textarea" => {
                        self.open_textarea.set(Some(index));
                        self.textarea_fresh.set(true);
                    }
                    "select" => {
                        *self.open_select.borrow_mut() = Some(OpenSelect {
                            index,
                            options: Vec::new(),
                            in_option: false,
                        });
                    }
                    _ => {}
                }
            }
            "option" => {
                self.push_if_has_id(tag, attrs);
                if let Some(select) = self.open_select.borrow_mut().as_mut() {
                    select.options.push(OptionEntry {
                        value: attr_value(attrs, "value"),
                        text: String::new(),
                        selected: attrs.iter().any(|a| a.name.local.as_ref() == "selected"),
                    });
                    select.in_option = true;
                }
            }
            "optgroup" => {
                self.push_if_has_id(tag, attrs);
                if let Some(select) = self.open_select.borrow_mut().as_mut() {
                    select.in_option = false;
                }
            }
            _ => self.push_if_has_id(tag, attrs),
        }
        raw_kind(tag).map_or(TokenSinkResult::Continue, TokenSinkResult::RawData)
    }

    fn end_tag(&self, tag: &str) {
        let depth = self.template_depth.get();
        if depth > 0 {
            if tag == "template" {
                self.template_depth.set(depth - 1);
            }
            return;
        }
        match tag {
            "form" => self.open_form.set(None),
            "textarea" => self.open_textarea.set(None),
            "select" => self.close_select(),
            "option" | "optgroup" => {
                if let Some(select) = self.open_select.borrow_mut().as_mut() {
                    select.in_option = false;
                }
            }
            _ => {}
        }
    }

    fn open_form_element(&self, attrs: &[Attribute]) {
        let mut forms = self.forms.borrow_mut();
        let index = forms.len();
        forms.push(FormElement {
            index,
            id: attr_value(attrs, "id"),
            action: attr_value(attrs, "action"),
            method: attr_value(attrs, "method"),
            controls: Vec::new(),
        });
        self.open_form.set(Some(index));
    }

    fn push_if_has_id(&self, tag: &str, attrs: &[Attribute]) {
        if attrs.iter().any(|a| a.name.local.as_ref() == "id") {
            self.push_element(tag, attrs, false);
        }
    }

    /// 记录元素，is_control 为 true 时读取 value 并归属到当前表单
    fn push_element(&self, tag: &str, attrs: &[Attribute], is_control: bool) -> usize {
        let form = self.open_form.get();
        // textarea / select 的值在内容解析完后填入
        let value = match tag {
            "input" | "button" if is_control => attr_value(attrs, "value").unwrap_or_default(),
            _ => String::new(),
        };

        let mut elements = self.elements.borrow_mut();
        let index = elements.len();
        elements.push(Element::new(
            tag,
            attr_value(attrs, "id"),
            attr_value(attrs, "name"),
            form,
            value,
        ));

        if let Some(form_index) = form {
            if let Some(f) = self.forms.borrow_mut().get_mut(form_index) {
                f.controls.push(index);
            }
        }
        index
    }

    fn push_textarea_text(&self, text: &str) {
        let Some(index) = self.open_textarea.get() else {
            return;
        };
        let mut text = text;
        if self.textarea_fresh.replace(false) {
            text = text.strip_prefix('\n').unwrap_or(text);
        }
        if let Some(element) = self.elements.borrow().get(index) {
            element.append_value(text);
        }
    }

    fn push_option_text(&self, text: &str) {
        if let Some(select) = self.open_select.borrow_mut().as_mut() {
            if select.in_option {
                if let Some(option) = select.options.last_mut() {
                    option.text.push_str(text);
                }
            }
        }
    }

    /// 结算 select 的值：最后一个 selected 的 option，否则第一个 option
    fn close_select(&self) {
        let Some(select) = self.open_select.borrow_mut().take() else {
            return;
        };
        let value = select
            .options
            .iter()
            .rev()
            .find(|o| o.selected)
            .or_else(|| select.options.first())
            .map(OptionEntry::value)
            .unwrap_or_default();
        if let Some(element) = self.elements.borrow().get(select.index) {
            element.replace_value(&value);
        }
    }
}

/// 需要切换到原始文本状态的标签
fn raw_kind(tag: &str) -> Option<RawKind> {
    match tag {
        "textarea" | "title" => Some(RawKind::Rcdata),
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        _ => None,
    }
}

/// 读取属性值
fn attr_value(attrs: &[Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|a| a.name.local.as_ref() == name)
        .map(|a| a.value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_extractor() {
        let html = r#"
            <h1 id="title">下载</h1>
            <form id="fetch" action="/" method="post">
                <input type="text" id="code" name="code" value=" Ab12Cd ">
                <button type="submit">提取</button>
            </form>
            <form action="/search">
                <input name="q">
            </form>
        "#;

        let (forms, elements) = FormExtractor::extract(html);

        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].id.as_deref(), Some("fetch"));
        assert_eq!(forms[0].method.as_deref(), Some("post"));
        assert_eq!(forms[0].controls.len(), 2);
        assert_eq!(forms[1].id, None);
        assert_eq!(forms[1].controls.len(), 1);

        // h1 + input + button + input
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].tag, "h1");
        assert_eq!(elements[0].form, None);
        assert_eq!(elements[1].id.as_deref(), Some("code"));
        assert_eq!(elements[1].value(), " Ab12Cd ");
        assert_eq!(elements[1].form, Some(0));
        assert_eq!(elements[3].name.as_deref(), Some("q"));
        assert_eq!(elements[3].form, Some(1));
    }

    #[test]
    fn test_textarea_value() {
        let html = "<form><textarea id=\"code\">\nab<12>\n</textarea></form>";
        let (_, elements) = FormExtractor::extract(html);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].value(), "ab<12>\n");
    }

    #[test]
    fn test_nested_form_is_ignored() {
        let html = r#"<form id="a"><form id="b"><input id="code"></form></form>"#;
        let (forms, elements) = FormExtractor::extract(html);
        assert_eq!(forms.len(), 1);
        assert_eq!(elements[0].form, Some(0));
    }

    #[test]
    fn test_script_content_is_not_parsed() {
        let html = r#"<script>document.write('<input id="code">');</script><div id="box"></div>"#;
        let (forms, elements) = FormExtractor::extract(html);
        assert!(forms.is_empty());
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].id.as_deref(), Some("box"));
    }

    #[test]
    fn test_select_value_from_first_option_text() {
        let html = "<form><select id=\"code\"><option>  Ab12Cd \n</option><option>ZZ9988</option></select></form>";
        let (forms, elements) = FormExtractor::extract(html);
        assert_eq!(forms[0].controls.len(), 1);
        assert_eq!(elements[0].tag, "select");
        assert_eq!(elements[0].value(), "Ab12Cd");
    }

    #[test]
    fn test_select_value_prefers_selected_option() {
        let html = r#"<select id="code">
            <optgroup label="a"><option value="first1">一</option></optgroup>
            <option value="ZZ9988" selected>二</option>
            <option>三
        </select>"#;
        let (_, elements) = FormExtractor::extract(html);
        assert_eq!(elements[0].value(), "ZZ9988");
    }

    #[test]
    fn test_unclosed_select_is_settled() {
        let (_, elements) = FormExtractor::extract("<select id=\"code\"><option>Ab12Cd");
        assert_eq!(elements[0].value(), "Ab12Cd");
    }

    #[test]
    fn test_empty_select_has_empty_value() {
        let (_, elements) = FormExtractor::extract("<select id=\"code\"></select>");
        assert_eq!(elements[0].value(), "");
    }

    #[test]
    fn test_button_value() {
        let html = r#"<form><button id="code" value="Ab12Cd">提取</button></form>"#;
        let (_, elements) = FormExtractor::extract(html);
        assert_eq!(elements[0].tag, "button");
        assert_eq!(elements[0].value(), "Ab12Cd");
    }

    #[test]
    fn test_template_content_is_skipped() {
        let html = r#"
            <template><form id="t"><input id="code" value="bad"></form><template><p id="deep"></p></template></template>
            <form id="real"><template><input id="code"></template><input name="q"></form>
        "#;
        let (forms, elements) = FormExtractor::extract(html);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].id.as_deref(), Some("real"));
        assert_eq!(forms[0].controls.len(), 1);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name.as_deref(), Some("q"));
    }
}
