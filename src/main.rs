//! rsformguard 命令行：加载页面、模拟输入并提交表单
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rsformguard::{
    ConfigManager, Document, FormGuard, GuardError, GuardResult, LookupScope, RecordingNotifier,
};

#[derive(Debug, Parser)]
#[command(name = "rsformguard", version, about = "提交前校验页面表单中的提取码")]
struct Cli {
    /// HTML 页面路径
    html: PathBuf,
    /// 模拟用户输入，格式 ID=VALUE，可重复
    #[arg(long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,
    /// 要提交的表单：下标或 form 的 id
    #[arg(long, default_value = "0")]
    form: String,
    /// 输入框查找范围（document | form）
    #[arg(long)]
    scope: Option<LookupScope>,
    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,
    /// 输出调试日志
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => ConfigManager::from_json_file(path)
            .with_context(|| format!("加载配置失败：{}", path.display()))?,
        None => ConfigManager::get_default(),
    };
    if let Some(scope) = cli.scope {
        config.lookup_scope = scope;
    }
    config.verbose |= cli.verbose;

    let document = Document::from_file(&cli.html)
        .with_context(|| format!("读取页面失败：{}", cli.html.display()))?;

    for entry in &cli.set {
        let (id, value) = parse_assignment(entry)?;
        document.set_value(id, value)?;
    }

    let form = resolve_form(&document, &cli.form)?;

    let recorder = Rc::new(RecordingNotifier::new());
    let guard = Rc::new(FormGuard::new(config, recorder.clone())?);
    guard.initialize(&document)?;

    let outcome = document.submit(form)?;
    for message in recorder.take() {
        println!("alert: {}", message);
    }
    if let Some(id) = document.focused_id() {
        println!("focus: #{}", id);
    }
    println!("{}", outcome.as_str());

    if !outcome.is_submitted() {
        process::exit(1);
    }
    Ok(())
}

/// 按下标或 id 定位表单
fn resolve_form(document: &Document, form: &str) -> anyhow::Result<usize> {
    if let Ok(index) = form.parse::<usize>() {
        if index < document.form_count() {
            return Ok(index);
        }
        bail!("页面共有{}个表单，下标{}越界", document.form_count(), index);
    }
    document
        .form_by_id(form)
        .map(|f| f.index)
        .with_context(|| format!("找不到 id 为 {} 的表单", form))
}

/// 解析 --set 的 ID=VALUE；值可以为空，id 不能为空
fn parse_assignment(entry: &str) -> GuardResult<(&str, &str)> {
    match entry.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => Ok((id.trim(), value)),
        _ => Err(GuardError::InvalidInput(format!(
            "--set 参数格式应为 ID=VALUE：{}",
            entry
        ))),
    }
}
