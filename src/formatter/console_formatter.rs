use crate::formatter::{LogFormatter, DEFAULT_TIME_FORMAT};
use crate::level::StructuredLevel;
use crate::record::LogRecord;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use smart_default::SmartDefault;
use std::fmt::Write;

/// ConsoleFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConsoleFormatterConfig {
    /// 时间格式（chrono 格式串）
    #[default(DEFAULT_TIME_FORMAT.to_string())]
    pub time_format: String,
}

/// 结构化后端的终端格式
///
/// 以制表符分隔：`时间  级别  调用位置  消息  {字段 JSON}`，
/// 没有调用位置或字段时对应列省略。
pub struct ConsoleFormatter {
    config: ConsoleFormatterConfig,
}

impl ConsoleFormatter {
    pub fn new(config: ConsoleFormatterConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for ConsoleFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let mut result = String::with_capacity(64 + record.message.len());

        write!(result, "{}", record.timestamp.format(&self.config.time_format))?;
        result.push('\t');
        result.push_str(StructuredLevel::from(record.level).as_str());

        if let Some(caller) = &record.caller {
            write!(result, "\t{}", caller)?;
        }

        result.push('\t');
        result.push_str(&record.message);

        if !record.fields.is_empty() {
            let mut fields = Map::with_capacity(record.fields.len());
            for (key, value) in &record.fields {
                fields.insert(key.clone(), serde_json::to_value(value)?);
            }
            result.push('\t');
            result.push_str(&serde_json::to_string(&Value::Object(fields))?);
        }

        Ok(result)
    }
}

impl From<ConsoleFormatterConfig> for ConsoleFormatter {
    fn from(config: ConsoleFormatterConfig) -> Self {
        Self::new(config)
    }
}
