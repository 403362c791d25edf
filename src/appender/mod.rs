mod console_appender;
mod destination;
mod memory_appender;
mod merged_appender;
mod registry;
mod rolling_file_appender;
mod trait_;

pub use console_appender::{ConsoleAppender, ConsoleAppenderConfig, ConsoleTarget};
pub use destination::{resolve_file_path, Destination, STDERR_KEY, STDOUT_KEY};
pub use memory_appender::MemoryAppender;
pub use merged_appender::MergedAppender;
pub use registry::WriterRegistry;
pub use rolling_file_appender::{RollingFileAppender, RollingFileAppenderConfig};
pub use trait_::LogAppender;
