use crate::appender::LogAppender;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// 终端输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

impl ConsoleTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}

/// ConsoleAppender 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleAppenderConfig {
    /// 输出到 stdout 还是 stderr
    pub target: ConsoleTarget,
}

/// 终端输出器
///
/// 每次写入都持有标准流的锁，多线程并发写入时不会出现半行交错。
pub struct ConsoleAppender {
    config: ConsoleAppenderConfig,
}

impl ConsoleAppender {
    pub fn new(config: ConsoleAppenderConfig) -> Self {
        Self { config }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleAppenderConfig {
            target: ConsoleTarget::Stdout,
        })
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleAppenderConfig {
            target: ConsoleTarget::Stderr,
        })
    }

    pub fn target(&self) -> ConsoleTarget {
        self.config.target
    }
}

impl LogAppender for ConsoleAppender {
    fn append(&self, buf: &[u8]) -> io::Result<usize> {
        match self.config.target {
            ConsoleTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(buf)?;
                stdout.flush()?;
            }
            ConsoleTarget::Stderr => {
                let mut stderr = io::stderr().lock();
                stderr.write_all(buf)?;
            }
        }
        Ok(buf.len())
    }

    fn flush(&self) -> io::Result<()> {
        match self.config.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        }
    }
}

impl From<ConsoleAppenderConfig> for ConsoleAppender {
    fn from(config: ConsoleAppenderConfig) -> Self {
        Self::new(config)
    }
}
