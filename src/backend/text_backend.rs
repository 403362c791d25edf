use crate::appender::LogAppender;
use crate::backend::{Backend, BackendParts};
use crate::level::{BackendKind, Level};
use crate::record::{CallSite, MetadataValue};
use std::sync::Arc;

/// 文本后端
///
/// 附加字段以 `key:value` 的形式拼接到消息之后。没有 dpanic 级别，
/// DPanic 折叠为 panic，因此输出后总会 panic。
pub struct TextBackend {
    level: Level,
    parts: BackendParts,
}

impl TextBackend {
    pub fn new(level: Level, parts: BackendParts) -> Self {
        Self { level, parts }
    }
}

/// `msg` + `[("k", v)]` -> `msg k:v`
fn inline_fields(message: &str, fields: &[(String, MetadataValue)]) -> String {
    let mut inlined = String::with_capacity(message.len() + fields.len() * 16);
    inlined.push_str(message);
    for (key, value) in fields {
        inlined.push(' ');
        inlined.push_str(key);
        inlined.push(':');
        inlined.push_str(&value.to_string());
    }
    inlined
}

impl Backend for TextBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Text
    }

    fn level(&self) -> Level {
        self.level
    }

    fn with_level(&self, level: Level) -> Arc<dyn Backend> {
        Arc::new(TextBackend::new(level, self.parts.clone()))
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
        let message = if fields.is_empty() {
            message.to_string()
        } else {
            inline_fields(message, fields)
        };
        let record = self.parts.record(level, message, caller);
        self.parts.write(&record);
    }

    fn panics_at(&self, level: Level) -> bool {
        matches!(level, Level::DPanic | Level::Panic)
    }

    fn exit(&self) -> ! {
        self.parts.exit()
    }
}
