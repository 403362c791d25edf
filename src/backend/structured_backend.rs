use crate::appender::LogAppender;
use crate::backend::{Backend, BackendParts};
use crate::level::{BackendKind, Level};
use crate::record::{CallSite, MetadataValue};
use std::sync::Arc;

/// 结构化后端
///
/// 附加字段作为结构化字段交给格式化器。没有 trace 级别，TRACE 消息以 debug 输出；
/// DPanic 只在开发模式下 panic。
pub struct StructuredBackend {
    level: Level,
    parts: BackendParts,
}

impl StructuredBackend {
    pub fn new(level: Level, parts: BackendParts) -> Self {
        Self { level, parts }
    }
}

impl Backend for StructuredBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Structured
    }

    fn level(&self) -> Level {
        self.level
    }

    fn with_level(&self, level: Level) -> Arc<dyn Backend> {
        Arc::new(StructuredBackend::new(level, self.parts.clone()))
    }

    fn writer(&self) -> Arc<dyn LogAppender> {
        self.parts.writer.clone()
    }

    fn emit(
        &self,
        level: Level,
        message: &str,
        fields: &[(String, MetadataValue)],
        caller: Option<&CallSite>,
    ) {
        let mut record = self.parts.record(level, message.to_string(), caller);
        if !fields.is_empty() {
            record.fields = fields.to_vec();
        }
        self.parts.write(&record);
    }

    fn panics_at(&self, level: Level) -> bool {
        match level {
            Level::DPanic => self.parts.options.development,
            Level::Panic => true,
            _ => false,
        }
    }

    fn exit(&self) -> ! {
        self.parts.exit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::MemoryAppender;
    use crate::backend::BackendOptions;
    use crate::formatter::{create_formatter, FormatterKind};

    fn backend(level: Level, formatter: FormatterKind, development: bool) -> (StructuredBackend, Arc<MemoryAppender>) {
        let sink = Arc::new(MemoryAppender::new());
        let parts = BackendParts {
            writer: sink.clone(),
            formatter: create_formatter(BackendKind::Structured, formatter),
            options: BackendOptions {
                name: "svc.test".to_string(),
                development,
                ..Default::default()
            },
        };
        (StructuredBackend::new(level, parts), sink)
    }

    #[test]
    fn test_trace_is_collapsed_to_debug() {
        let (backend, sink) = backend(Level::Trace, FormatterKind::Normal, false);
        assert_eq!(backend.level(), Level::Trace);
        assert!(backend.enabled(Level::Trace));

        backend.trace("tracing", &[], None);
        assert!(sink.contents().contains("\tdebug\ttracing"));
    }

    #[test]
    fn test_level_filtering() {
        let (backend, sink) = backend(Level::Warn, FormatterKind::Normal, false);
        backend.info("dropped", &[], None);
        backend.warn("kept", &[], None);
        backend.error("also kept", &[], None);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("\twarn\tkept"));
        assert!(lines[1].ends_with("\terror\talso kept"));
    }

    #[test]
    fn test_fields_are_structured() {
        let (backend, sink) = backend(Level::Info, FormatterKind::Json, false);
        backend.info(
            "request",
            &[
                ("path".to_string(), MetadataValue::from("/health")),
                ("status".to_string(), MetadataValue::from(200)),
            ],
            Some(&CallSite::new("src/http/server.rs", 88)),
        );

        let value: serde_json::Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        assert_eq!(value["msg"], "request");
        assert_eq!(value["path"], "/health");
        assert_eq!(value["status"], 200);
        assert_eq!(value["caller"], "http/server.rs:88");
    }

    #[test]
    fn test_with_level_shares_writer() {
        let (backend, sink) = backend(Level::Error, FormatterKind::Normal, false);
        let rebuilt = backend.with_level(Level::Info);

        assert_eq!(rebuilt.level(), Level::Info);
        assert_eq!(rebuilt.kind(), BackendKind::Structured);
        assert!(Arc::ptr_eq(&backend.writer(), &rebuilt.writer()));

        rebuilt.info("after rebuild", &[], None);
        assert!(sink.contents().contains("after rebuild"));
    }

    #[test]
    fn test_dpanic_only_panics_in_development() {
        let (production, sink) = backend(Level::Info, FormatterKind::Normal, false);
        production.dpanic("tolerated", &[], None);
        assert!(sink.contents().contains("\tdpanic\ttolerated"));

        let (development, sink) = backend(Level::Info, FormatterKind::Normal, true);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            development.dpanic("fatal in dev", &[], None);
        }));
        assert!(result.is_err());
        assert!(sink.contents().contains("fatal in dev"));
    }

    #[test]
    fn test_panic_even_when_disabled() {
        let (backend, sink) = backend(Level::Fatal, FormatterKind::Normal, false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            backend.panic("silent panic", &[], None);
        }));
        assert!(result.is_err());
        assert!(sink.is_empty());
    }
}
