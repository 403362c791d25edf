use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 日志级别
///
/// 按严重程度递增排列，数值（rank）用于开关判断：
/// 当 logger 的 rank <= 消息的 rank 时消息被输出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Level {
    /// 最详细的日志
    Trace = -2,
    /// 调试信息
    Debug = -1,
    /// 一般信息
    Info = 0,
    /// 警告信息
    Warn = 1,
    /// 错误信息
    Error = 2,
    /// 开发模式下会 panic 的错误
    DPanic = 3,
    /// 输出后 panic
    Panic = 4,
    /// 输出后退出进程
    Fatal = 5,
}

impl Default for Level {
    fn default() -> Self {
        Level::Info
    }
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    /// 数值等级
    pub const fn rank(self) -> i8 {
        self as i8
    }

    /// 规范的大写名称
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    /// 宽松解析：未知或空字符串一律返回 INFO，从不失败
    pub fn parse_or_default(s: &str) -> Level {
        s.parse().unwrap_or_default()
    }

    /// 从数值等级还原，未知数值返回 INFO
    pub fn from_rank(rank: i8) -> Level {
        Level::ALL
            .into_iter()
            .find(|level| level.rank() == rank)
            .unwrap_or_default()
    }

    /// 当前级别是否允许输出 `other` 级别的消息
    pub fn enables(self, other: Level) -> bool {
        self.rank() <= other.rank()
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "DPANIC" => Ok(Level::DPanic),
            "PANIC" => Ok(Level::Panic),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(format!("invalid log level: {}", s)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// 结构化后端（字段以结构化形式输出）
    Structured,
    /// 文本后端（字段以 key:value 形式拼接到消息后）
    #[default]
    Text,
}

impl BackendKind {
    /// 宽松解析后端名称，未识别的名称回退到文本后端
    pub fn parse_or_default(s: &str) -> BackendKind {
        match s.trim().to_lowercase().as_str() {
            "structured" | "zap" => BackendKind::Structured,
            "text" | "logrus" => BackendKind::Text,
            _ => BackendKind::default(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BackendKind::Structured => "structured",
            BackendKind::Text => "text",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结构化后端的级别
///
/// 没有 trace 级别，TRACE 映射为 debug。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StructuredLevel {
    Debug,
    Info,
    Warn,
    Error,
    DPanic,
    Panic,
    Fatal,
}

impl StructuredLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            StructuredLevel::Debug => "debug",
            StructuredLevel::Info => "info",
            StructuredLevel::Warn => "warn",
            StructuredLevel::Error => "error",
            StructuredLevel::DPanic => "dpanic",
            StructuredLevel::Panic => "panic",
            StructuredLevel::Fatal => "fatal",
        }
    }
}

impl From<Level> for StructuredLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace | Level::Debug => StructuredLevel::Debug,
            Level::Info => StructuredLevel::Info,
            Level::Warn => StructuredLevel::Warn,
            Level::Error => StructuredLevel::Error,
            Level::DPanic => StructuredLevel::DPanic,
            Level::Panic => StructuredLevel::Panic,
            Level::Fatal => StructuredLevel::Fatal,
        }
    }
}

/// 文本后端的级别
///
/// 没有 dpanic 级别，DPANIC 折叠为 panic，因此在文本后端上
/// DPanic 输出之后一定会 panic。panic 排在 fatal 之后，视为最严重。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    Panic,
}

impl TextLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            TextLevel::Trace => "trace",
            TextLevel::Debug => "debug",
            TextLevel::Info => "info",
            TextLevel::Warning => "warning",
            TextLevel::Error => "error",
            TextLevel::Fatal => "fatal",
            TextLevel::Panic => "panic",
        }
    }
}

impl From<Level> for TextLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => TextLevel::Trace,
            Level::Debug => TextLevel::Debug,
            Level::Info => TextLevel::Info,
            Level::Warn => TextLevel::Warning,
            Level::Error => TextLevel::Error,
            Level::DPanic | Level::Panic => TextLevel::Panic,
            Level::Fatal => TextLevel::Fatal,
        }
    }
}

/// 后端专属的级别标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendToken {
    Structured(StructuredLevel),
    Text(TextLevel),
}

impl BackendToken {
    pub fn of(level: Level, kind: BackendKind) -> Self {
        match kind {
            BackendKind::Structured => BackendToken::Structured(level.into()),
            BackendKind::Text => BackendToken::Text(level.into()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BackendToken::Structured(level) => level.as_str(),
            BackendToken::Text(level) => level.as_str(),
        }
    }
}

impl fmt::Display for BackendToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 符号级别 -> 数值等级（未知返回 INFO 的等级）
pub fn to_rank(symbolic: &str) -> i8 {
    Level::parse_or_default(symbolic).rank()
}

/// 数值等级 -> 符号级别（未知返回 "INFO"）
pub fn to_symbolic(rank: i8) -> &'static str {
    Level::from_rank(rank).as_str()
}

/// 符号级别 -> 后端级别标记
pub fn to_backend_token(symbolic: &str, kind: BackendKind) -> BackendToken {
    BackendToken::of(Level::parse_or_default(symbolic), kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("trace").unwrap(), Level::Trace);
        assert_eq!(Level::from_str("DEBUG").unwrap(), Level::Debug);
        assert_eq!(Level::from_str("Info").unwrap(), Level::Info);
        assert_eq!(Level::from_str("warning").unwrap(), Level::Warn);
        assert_eq!(Level::from_str("dpanic").unwrap(), Level::DPanic);
        assert_eq!(Level::from_str(" FATAL ").unwrap(), Level::Fatal);
        assert!(Level::from_str("invalid").is_err());
    }

    #[test]
    fn test_level_permissive_default() {
        assert_eq!(Level::parse_or_default(""), Level::Info);
        assert_eq!(Level::parse_or_default("verbose"), Level::Info);
        assert_eq!(to_rank("nonsense"), 0);
        assert_eq!(to_symbolic(42), "INFO");
    }

    #[test]
    fn test_rank_round_trip() {
        let expected = [-2, -1, 0, 1, 2, 3, 4, 5];
        for (level, rank) in Level::ALL.iter().zip(expected) {
            assert_eq!(level.rank(), rank);
            assert_eq!(Level::from_rank(rank), *level);
            assert_eq!(to_symbolic(to_rank(level.as_str())), level.as_str());
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Fatal > Level::Panic);
        assert!(Level::Panic > Level::DPanic);
        assert!(Level::DPanic > Level::Error);
        assert!(Level::Warn > Level::Info);
        assert!(Level::Debug > Level::Trace);
        assert!(Level::Warn.enables(Level::Error));
        assert!(Level::Warn.enables(Level::Warn));
        assert!(!Level::Warn.enables(Level::Info));
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse_or_default("ZAP"), BackendKind::Structured);
        assert_eq!(BackendKind::parse_or_default("structured"), BackendKind::Structured);
        assert_eq!(BackendKind::parse_or_default("Logrus"), BackendKind::Text);
        assert_eq!(BackendKind::parse_or_default("log4j"), BackendKind::Text);
    }

    #[test]
    fn test_backend_token_structured() {
        let token = |s: &str| to_backend_token(s, BackendKind::Structured).as_str();
        assert_eq!(token("TRACE"), "debug");
        assert_eq!(token("DEBUG"), "debug");
        assert_eq!(token("WARN"), "warn");
        assert_eq!(token("DPANIC"), "dpanic");
        assert_eq!(token("PANIC"), "panic");
        assert_eq!(token("bogus"), "info");
    }

    #[test]
    fn test_backend_token_text_collapses_dpanic() {
        let token = |s: &str| to_backend_token(s, BackendKind::Text).as_str();
        assert_eq!(token("TRACE"), "trace");
        assert_eq!(token("WARN"), "warning");
        assert_eq!(token("DPANIC"), "panic");
        assert_eq!(token("PANIC"), "panic");
        assert_eq!(token("FATAL"), "fatal");
    }

    #[test]
    fn test_text_level_ordering() {
        assert!(TextLevel::Panic > TextLevel::Fatal);
        assert!(TextLevel::Warning > TextLevel::Info);
    }
}
