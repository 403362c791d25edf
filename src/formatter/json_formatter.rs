use crate::formatter::{LogFormatter, DEFAULT_TIME_FORMAT};
use crate::level::{BackendKind, BackendToken};
use crate::record::LogRecord;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use smart_default::SmartDefault;

/// JsonFormatter 配置
///
/// 键名可配置：结构化后端习惯 `ts/level/caller/msg`，
/// 文本后端习惯 `time/level/file/msg`。
#[derive(Debug, Clone, Deserialize, PartialEq, SmartDefault)]
#[serde(default, rename_all = "kebab-case")]
pub struct JsonFormatterConfig {
    #[default(DEFAULT_TIME_FORMAT.to_string())]
    pub time_format: String,
    #[default("ts".to_string())]
    pub time_key: String,
    #[default("level".to_string())]
    pub level_key: String,
    #[default("msg".to_string())]
    pub message_key: String,
    #[default("caller".to_string())]
    pub caller_key: String,
    /// 级别名称风格
    #[default(BackendKind::Structured)]
    pub level_style: BackendKind,
}

impl JsonFormatterConfig {
    /// 结构化后端的默认键名
    pub fn structured() -> Self {
        Self::default()
    }

    /// 文本后端的默认键名
    pub fn text() -> Self {
        Self {
            time_key: "time".to_string(),
            caller_key: "file".to_string(),
            level_style: BackendKind::Text,
            ..Self::default()
        }
    }
}

/// JSON 格式化器
///
/// 每条记录一行 JSON 对象，附加字段平铺在顶层。
pub struct JsonFormatter {
    config: JsonFormatterConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonFormatterConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let mut object = Map::with_capacity(4 + record.fields.len());

        object.insert(
            self.config.level_key.clone(),
            Value::from(BackendToken::of(record.level, self.config.level_style).as_str()),
        );
        object.insert(
            self.config.time_key.clone(),
            Value::from(record.timestamp.format(&self.config.time_format).to_string()),
        );
        if let Some(caller) = &record.caller {
            object.insert(self.config.caller_key.clone(), Value::from(caller.to_string()));
        }
        object.insert(
            self.config.message_key.clone(),
            Value::from(record.message.as_str()),
        );

        for (key, value) in &record.fields {
            object.insert(key.clone(), serde_json::to_value(value)?);
        }

        Ok(serde_json::to_string(&Value::Object(object))?)
    }
}

impl From<JsonFormatterConfig> for JsonFormatter {
    fn from(config: JsonFormatterConfig) -> Self {
        Self::new(config)
    }
}
