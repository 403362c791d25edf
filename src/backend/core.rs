use crate::appender::LogAppender;
use crate::formatter::LogFormatter;
use crate::level::{BackendKind, Level};
use crate::record::{CallSite, LogRecord, MetadataValue};
use std::fmt;
use std::sync::Arc;

/// Fatal 级别的退出处理函数，参数为退出码
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// 默认退出处理：直接结束进程
pub fn default_exit_handler() -> ExitHandler {
    Arc::new(|code| std::process::exit(code))
}

/// 后端构建选项
#[derive(Clone)]
pub struct BackendOptions {
    /// logger 名称，写入每条记录
    pub name: String,
    /// 是否记录调用位置
    pub report_caller: bool,
    /// 开发模式：结构化后端的 DPanic 会 panic
    pub development: bool,
    /// Fatal 的退出处理
    pub exit: ExitHandler,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            report_caller: true,
            development: false,
            exit: default_exit_handler(),
        }
    }
}

impl fmt::Debug for BackendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendOptions")
            .field("name", &self.name)
            .field("report_caller", &self.report_caller)
            .field("development", &self.development)
            .finish_non_exhaustive()
    }
}

/// 后端共享的组件：输出器、格式化器、选项
///
/// 修改级别时整体复用，不会重新向输出器注册表申请输出器。
#[derive(Clone)]
pub struct BackendParts {
    pub writer: Arc<dyn LogAppender>,
    pub formatter: Arc<dyn LogFormatter>,
    pub options: BackendOptions,
}

impl BackendParts {
    /// 格式化并写出一条记录，失败时尽量写出原始消息，错误不向上传播
    pub(crate) fn write(&self, record: &LogRecord) {
        let mut line = match self.formatter.format(record) {
            Ok(line) => line,
            Err(_) => record.message.clone(),
        };
        line.push('\n');
        let _ = self.writer.append(line.as_bytes());
    }

    pub(crate) fn record(
        &self,
        level: Level,
        message: String,
        caller: Option<&CallSite>,
    ) -> LogRecord {
        let caller = if self.options.report_caller {
            caller.cloned()
        } else {
            None
        };
        LogRecord::new(level, message)
            .with_logger(self.options.name.as_str())
            .with_caller(caller)
    }

    /// Fatal：刷新输出器后调用退出处理，处理函数返回时仍然退出进程
    pub(crate) fn exit(&self) -> ! {
        let _ = self.writer.flush();
        (self.options.exit)(1);
        std::process::exit(1)
    }
}

/// 日志后端
///
/// 两种实现（[`StructuredBackend`](crate::backend::StructuredBackend)、
/// [`TextBackend`](crate::backend::TextBackend)）共享同一套接口。
/// 后端内部的级别不可变，修改级别通过 [`Backend::with_level`] 生成新实例。
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// 当前级别
    fn level(&self) -> Level;

    /// 使用新级别重建后端，复用输出器和格式化器
    fn with_level(&self, level: Level) -> Arc<dyn Backend>;

    /// 后端写入的合并输出器
    fn writer(&self) -> Arc<dyn LogAppender>;

    /// 写出一条记录，不做级别判断，也不处理 panic/fatal
    fn emit(
        &self,
        level: Level,
        message: &str,
        fields: &[(String, MetadataValue)],
        caller: Option<&CallSite>,
    );

    /// 该级别输出后是否 panic
    fn panics_at(&self, level: Level) -> bool;

    /// Fatal 的终止流程
    fn exit(&self) -> !;

    fn enabled(&self, level: Level) -> bool {
        self.level().enables(level)
    }

    /// 级别判断 + 写出 + 终止处理
    ///
    /// Panic/Fatal（以及需要 panic 的 DPanic）即使级别被关闭也会终止，
    /// 只是不写出消息。
    fn log(
        &self,
        level: Level,
        message: &str,
        fields: &[(String, MetadataValue)],
        caller: Option<&CallSite>,
    ) {
        if self.enabled(level) {
            self.emit(level, message, fields, caller);
        }
        if level == Level::Fatal {
            self.exit();
        }
        if self.panics_at(level) {
            panic!("{}", message);
        }
    }

    fn trace(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::Trace, message, fields, caller)
    }

    fn debug(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::Debug, message, fields, caller)
    }

    fn info(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::Info, message, fields, caller)
    }

    fn warn(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::Warn, message, fields, caller)
    }

    fn error(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::Error, message, fields, caller)
    }

    fn dpanic(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::DPanic, message, fields, caller)
    }

    fn panic(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::Panic, message, fields, caller)
    }

    fn fatal(&self, message: &str, fields: &[(String, MetadataValue)], caller: Option<&CallSite>) {
        self.log(Level::Fatal, message, fields, caller)
    }
}
