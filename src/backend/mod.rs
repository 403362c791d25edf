mod core;
mod structured_backend;
mod text_backend;

pub use self::core::{default_exit_handler, Backend, BackendOptions, BackendParts, ExitHandler};
pub use structured_backend::StructuredBackend;
pub use text_backend::TextBackend;

use crate::appender::LogAppender;
use crate::formatter::{create_formatter, FormatterKind};
use crate::level::{BackendKind, Level};
use std::sync::Arc;

/// 按后端类型构建后端，绑定合并输出器、格式化器和级别
pub fn build(
    kind: BackendKind,
    level: Level,
    formatter: FormatterKind,
    writer: Arc<dyn LogAppender>,
    options: BackendOptions,
) -> Arc<dyn Backend> {
    let parts = BackendParts {
        writer,
        formatter: create_formatter(kind, formatter),
        options,
    };
    match kind {
        BackendKind::Structured => Arc::new(StructuredBackend::new(level, parts)),
        BackendKind::Text => Arc::new(TextBackend::new(level, parts)),
    }
}
