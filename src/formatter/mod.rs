mod console_formatter;
mod core;
mod json_formatter;
mod text_formatter;

pub use console_formatter::{ConsoleFormatter, ConsoleFormatterConfig};
pub use self::core::{LogFormatter, DEFAULT_TIME_FORMAT};
pub use json_formatter::{JsonFormatter, JsonFormatterConfig};
pub use text_formatter::{TextFormatter, TextFormatterConfig};

use crate::level::BackendKind;
use std::fmt;
use std::sync::Arc;

/// 格式选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatterKind {
    #[default]
    Normal,
    Json,
}

impl FormatterKind {
    /// 宽松解析，未知名称回退到 normal
    pub fn parse_or_default(s: &str) -> FormatterKind {
        match s.trim().to_lowercase().as_str() {
            "json" => FormatterKind::Json,
            _ => FormatterKind::Normal,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FormatterKind::Normal => "normal",
            FormatterKind::Json => "json",
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按后端类型和格式选择创建格式化器
pub fn create_formatter(backend: BackendKind, kind: FormatterKind) -> Arc<dyn LogFormatter> {
    match (backend, kind) {
        (BackendKind::Structured, FormatterKind::Normal) => {
            Arc::new(ConsoleFormatter::new(ConsoleFormatterConfig::default()))
        }
        (BackendKind::Structured, FormatterKind::Json) => {
            Arc::new(JsonFormatter::new(JsonFormatterConfig::structured()))
        }
        (BackendKind::Text, FormatterKind::Normal) => {
            Arc::new(TextFormatter::new(TextFormatterConfig::default()))
        }
        (BackendKind::Text, FormatterKind::Json) => {
            Arc::new(JsonFormatter::new(JsonFormatterConfig::text()))
        }
    }
}
