use crate::level::Level;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::panic::Location;

/// 字段值，支持多种类型
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Null,
    /// 任意 JSON 兼容的数据
    Json(Value),
}

impl Serialize for MetadataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetadataValue::String(s) => serializer.serialize_str(s),
            MetadataValue::I64(n) => serializer.serialize_i64(*n),
            MetadataValue::U64(n) => serializer.serialize_u64(*n),
            MetadataValue::F64(n) => serializer.serialize_f64(*n),
            MetadataValue::Bool(b) => serializer.serialize_bool(*b),
            MetadataValue::Null => serializer.serialize_none(),
            MetadataValue::Json(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{}", s),
            MetadataValue::I64(n) => write!(f, "{}", n),
            MetadataValue::U64(n) => write!(f, "{}", n),
            MetadataValue::F64(n) => write!(f, "{}", n),
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Null => write!(f, "null"),
            MetadataValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl MetadataValue {
    /// 从任意实现了 Serialize 的结构体创建字段值，序列化失败时为 Null
    pub fn from_struct<T: Serialize>(value: T) -> Self {
        serde_json::to_value(value)
            .map(MetadataValue::Json)
            .unwrap_or(MetadataValue::Null)
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::I64(n)
    }
}

impl From<i32> for MetadataValue {
    fn from(n: i32) -> Self {
        MetadataValue::I64(n as i64)
    }
}

impl From<u64> for MetadataValue {
    fn from(n: u64) -> Self {
        MetadataValue::U64(n)
    }
}

impl From<u32> for MetadataValue {
    fn from(n: u32) -> Self {
        MetadataValue::U64(n as u64)
    }
}

impl From<usize> for MetadataValue {
    fn from(n: usize) -> Self {
        MetadataValue::U64(n as u64)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::F64(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<Value> for MetadataValue {
    fn from(v: Value) -> Self {
        MetadataValue::Json(v)
    }
}

/// 调用位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// 捕获调用位置
    ///
    /// 调用链上的每一层都需要标注 `#[track_caller]`，
    /// 这样拿到的才是应用代码里的调用点而不是内部函数。
    #[track_caller]
    pub fn capture() -> Self {
        Self::from(Location::caller())
    }

    /// 文件名（去掉目录部分）
    pub fn file_name(&self) -> &str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file)
    }

    /// 最后一级目录加文件名，例如 `src/logger.rs`
    pub fn short_file(&self) -> &str {
        let mut separators = self
            .file
            .char_indices()
            .filter(|(_, c)| *c == '/' || *c == '\\')
            .map(|(i, _)| i)
            .rev();
        separators.next();
        match separators.next() {
            Some(idx) => &self.file[idx + 1..],
            None => &self.file,
        }
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.short_file(), self.line)
    }
}

/// 日志记录
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// 日志级别
    pub level: Level,
    /// 日志消息
    pub message: String,
    /// 所属 logger 名称
    pub logger: String,
    /// 调用位置
    pub caller: Option<CallSite>,
    /// 时间戳
    pub timestamp: DateTime<Local>,
    /// 附加字段（保持插入顺序）
    pub fields: Vec<(String, MetadataValue)>,
}

impl LogRecord {
    /// 创建新的日志记录
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            logger: String::new(),
            caller: None,
            timestamp: Local::now(),
            fields: Vec::new(),
        }
    }

    /// 添加字段
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// 批量添加字段
    pub fn with_fields<K>(mut self, fields: impl IntoIterator<Item = (K, MetadataValue)>) -> Self
    where
        K: Into<String>,
    {
        self.fields
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// 设置调用位置
    pub fn with_caller(mut self, caller: Option<CallSite>) -> Self {
        self.caller = caller;
        self
    }

    /// 设置 logger 名称
    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }
}
