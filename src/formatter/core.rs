use crate::record::LogRecord;
use anyhow::Result;

/// 默认时间格式，例如 `2024-03-01 10:20:30.123`
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 日志格式化器 trait
///
/// 负责将 LogRecord 格式化为一行文本（不含换行符）
pub trait LogFormatter: Send + Sync {
    /// 格式化日志记录
    fn format(&self, record: &LogRecord) -> Result<String>;
}
