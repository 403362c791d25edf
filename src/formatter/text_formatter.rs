use crate::formatter::{LogFormatter, DEFAULT_TIME_FORMAT};
use crate::level::TextLevel;
use crate::record::LogRecord;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::fmt::Write;

/// 最长的级别名（warning）的长度
const LEVEL_WIDTH: usize = 7;

/// TextFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default, rename_all = "kebab-case")]
pub struct TextFormatterConfig {
    /// 时间格式（chrono 格式串）
    #[default(DEFAULT_TIME_FORMAT.to_string())]
    pub time_format: String,

    /// 级别名补齐到相同宽度
    #[default = true]
    pub pad_level: bool,
}

/// 文本后端的 key=value 格式
///
/// `time="2024-03-01 10:20:30.123" level=info msg="hello world" file="src/main.rs:10"`
pub struct TextFormatter {
    config: TextFormatterConfig,
}

impl TextFormatter {
    pub fn new(config: TextFormatterConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let mut result = String::with_capacity(96 + record.message.len());

        let time = record.timestamp.format(&self.config.time_format).to_string();
        append_key_value(&mut result, "time", &time);

        let level = TextLevel::from(record.level).as_str();
        if self.config.pad_level {
            write!(result, " level={:<width$}", level, width = LEVEL_WIDTH)?;
        } else {
            write!(result, " level={}", level)?;
        }

        result.push(' ');
        append_key_value(&mut result, "msg", &record.message);

        for (key, value) in &record.fields {
            result.push(' ');
            append_key_value(&mut result, key, &value.to_string());
        }

        if let Some(caller) = &record.caller {
            result.push(' ');
            append_key_value(&mut result, "file", &caller.to_string());
        }

        Ok(result)
    }
}

fn append_key_value(buffer: &mut String, key: &str, value: &str) {
    buffer.push_str(key);
    buffer.push('=');
    if needs_quoting(value) {
        // Debug 输出会转义引号和控制字符
        let _ = write!(buffer, "{:?}", value);
    } else {
        buffer.push_str(value);
    }
}

/// 空值或包含非安全字符时需要加引号
fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+' | ':'))
}

impl From<TextFormatterConfig> for TextFormatter {
    fn from(config: TextFormatterConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::record::CallSite;

    #[test]
    fn test_text_formatter_format() {
        let formatter = TextFormatter::new(TextFormatterConfig::default());
        let record = LogRecord::new(Level::Info, "test message");

        let formatted = formatter.format(&record).unwrap();

        assert!(formatted.starts_with("time=\""));
        assert!(formatted.contains(" level=info    msg=\"test message\""));
        assert!(!formatted.contains("file="));
    }

    #[test]
    fn test_text_formatter_level_names() {
        let formatter = TextFormatter::new(TextFormatterConfig {
            pad_level: false,
            ..Default::default()
        });

        let warn = formatter.format(&LogRecord::new(Level::Warn, "w")).unwrap();
        assert!(warn.contains(" level=warning msg=w"));

        let dpanic = formatter.format(&LogRecord::new(Level::DPanic, "d")).unwrap();
        assert!(dpanic.contains(" level=panic msg=d"));
    }

    #[test]
    fn test_text_formatter_with_caller_and_fields() {
        let formatter = TextFormatter::new(TextFormatterConfig::default());
        let record = LogRecord::new(Level::Error, "failed")
            .with_field("attempt", 3)
            .with_field("reason", "timed out")
            .with_caller(Some(CallSite::new("/app/src/main.rs", 10)));

        let formatted = formatter.format(&record).unwrap();
        assert!(formatted.ends_with(" msg=failed attempt=3 reason=\"timed out\" file=src/main.rs:10"));
    }

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting(""));
        assert!(needs_quoting("hello world"));
        assert!(needs_quoting("say \"hi\""));
        assert!(!needs_quoting("plain"));
        assert!(!needs_quoting("src/main.rs:10"));
    }

    #[test]
    fn test_quoted_value_escapes() {
        let mut buffer = String::new();
        append_key_value(&mut buffer, "msg", "say \"hi\"");
        assert_eq!(buffer, r#"msg="say \"hi\"""#);
    }
}
