//! logx - 可运行时调整级别的日志门面
//!
//! 应用代码通过名称获取 logger 并输出分级日志，而不直接依赖具体的日志后端。
//!
//! ## 模块
//!
//! - **level**: 级别定义以及级别名称、数值、后端标记之间的转换
//! - **appender**: 输出目标（终端、滚动文件、内存），按目标去重的输出器注册表
//! - **formatter**: 日志格式化（normal / json）
//! - **backend**: 结构化后端与文本后端
//! - **registry**: logger 注册表，支持按名称前缀查询和修改级别
//! - **factory**: logger 工厂，从配置创建 logger
//! - **global**: 进程级默认工厂
//! - **bridge**: `log` crate 桥接
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use logx::{info, logger, LoggerFactory, LoggingConfig};
//!
//! let config = LoggingConfig::from_json(r#"
//!     {
//!         factory: "structured",
//!         "root-level": "WARN",
//!         "package-levels": { "svc.db": "DEBUG" },
//!         appenders: [
//!             { type: "stdout" },
//!             { type: "file", options: { "log-file-dir": "./logs", "max-file-age": "24h" } },
//!         ],
//!     }
//! "#).unwrap();
//!
//! let factory = LoggerFactory::new(config);
//! let log = logger!(factory);
//! info!(log, "user logged in", "user_id" => 12345);
//!
//! // 运行时调整整棵子树的级别
//! factory.set_levels("svc", "DEBUG");
//! ```

pub mod appender;
pub mod backend;
pub mod bridge;
pub mod cfg;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod global;
pub mod level;
pub mod logger;
pub mod macros;
pub mod record;
pub mod registry;

// 重新导出主要的公共 API
pub use appender::{Destination, LogAppender, MemoryAppender, WriterRegistry};
pub use backend::Backend;
pub use cfg::{AppenderConfig, LoggingConfig};
pub use error::{LogError, Result};
pub use factory::{Caller, LoggerFactory, NameResolver};
pub use formatter::{FormatterKind, LogFormatter};
pub use level::{to_backend_token, to_rank, to_symbolic, BackendKind, BackendToken, Level};
pub use logger::Logger;
pub use record::{CallSite, LogRecord, MetadataValue};
pub use registry::{LoggerRecord, LoggerRegistry};
