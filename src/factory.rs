use crate::appender::{Destination, MergedAppender, WriterRegistry};
use crate::backend::{self, default_exit_handler, BackendOptions, ExitHandler};
use crate::cfg::LoggingConfig;
use crate::error::{LogError, Result};
use crate::level::{BackendKind, Level};
use crate::logger::Logger;
use crate::registry::{LoggerRecord, LoggerRegistry};
use std::collections::HashMap;
use std::io;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

/// 调用方信息，用于推导 logger 名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// 模块路径（宏调用时由 `module_path!()` 提供）
    pub module_path: Option<String>,
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(module_path: Option<&str>, file: impl Into<String>, line: u32) -> Self {
        Self {
            module_path: module_path.map(str::to_string),
            file: file.into(),
            line,
        }
    }

    /// 捕获调用位置，没有模块路径信息
    #[track_caller]
    pub fn capture() -> Self {
        let location = Location::caller();
        Self::new(None, location.file(), location.line())
    }
}

/// 调用方 -> logger 名称
pub type NameResolver = Arc<dyn Fn(&Caller) -> String + Send + Sync>;

/// 默认名称解析：优先使用模块路径，否则使用源文件所在目录
pub fn default_name_resolver() -> NameResolver {
    Arc::new(|caller: &Caller| match &caller.module_path {
        Some(module_path) if !module_path.is_empty() => module_path.clone(),
        _ => Path::new(&caller.file)
            .parent()
            .map(|dir| dir.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default(),
    })
}

/// logger 工厂
///
/// 负责推导名称、解析级别、合并输出器、构建后端并注册。输出器注册表和
/// logger 注册表可以在多个工厂之间共享。
pub struct LoggerFactory {
    config: LoggingConfig,
    kind: BackendKind,
    writers: Arc<WriterRegistry>,
    loggers: Arc<LoggerRegistry>,
    resolver: NameResolver,
    exit: ExitHandler,
}

impl LoggerFactory {
    /// 使用独立的注册表创建工厂
    pub fn new(config: LoggingConfig) -> Self {
        Self::with_registries(
            config,
            Arc::new(WriterRegistry::new()),
            Arc::new(LoggerRegistry::new()),
        )
    }

    pub fn with_registries(
        config: LoggingConfig,
        writers: Arc<WriterRegistry>,
        loggers: Arc<LoggerRegistry>,
    ) -> Self {
        Self {
            kind: config.backend_kind(),
            config,
            writers,
            loggers,
            resolver: default_name_resolver(),
            exit: default_exit_handler(),
        }
    }

    /// 替换名称解析函数
    pub fn with_name_resolver(
        mut self,
        resolver: impl Fn(&Caller) -> String + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// 替换 Fatal 的退出处理
    pub fn with_exit_handler(mut self, exit: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit = Arc::new(exit);
        self
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn writers(&self) -> &Arc<WriterRegistry> {
        &self.writers
    }

    pub fn loggers(&self) -> &Arc<LoggerRegistry> {
        &self.loggers
    }

    /// 以调用位置推导名称创建 logger
    #[track_caller]
    pub fn logger(&self) -> Logger {
        self.new_logger(&Caller::capture())
    }

    /// 按调用方信息创建 logger
    ///
    /// 名称为空时使用 `root-name`。同名 logger 已存在时返回已有的实例。
    pub fn new_logger(&self, caller: &Caller) -> Logger {
        let name = self.name_for(caller);
        self.named(&name)
    }

    /// 按名称创建 logger
    ///
    /// 日志文件无法打开时打印 `Fatal! <错误>` 并退出进程。
    pub fn named(&self, name: &str) -> Logger {
        let record = self.loggers.get_or_insert_with(name, || {
            let destinations = self.config.destinations();
            let writer = self.writers.compose(name, &destinations);
            self.build_record(name, destinations, writer)
        });
        Logger::new(record, self.loggers.clone())
    }

    /// 按名称创建 logger，日志文件无法打开时返回错误
    pub fn try_named(&self, name: &str) -> Result<Logger> {
        let record = self.loggers.get_or_try_insert_with(name, || {
            let destinations = self.config.destinations();
            let writer = self.writers.try_compose(name, &destinations)?;
            Ok::<_, LogError>(self.build_record(name, destinations, writer))
        })?;
        Ok(Logger::new(record, self.loggers.clone()))
    }

    fn name_for(&self, caller: &Caller) -> String {
        let name = (self.resolver)(caller);
        if name.is_empty() {
            self.config.root_name.clone()
        } else {
            name
        }
    }

    fn build_record(
        &self,
        name: &str,
        destinations: Vec<Destination>,
        writer: Arc<MergedAppender>,
    ) -> LoggerRecord {
        let backend = backend::build(
            self.kind,
            self.resolve_level(name),
            self.config.formatter_kind(),
            writer,
            BackendOptions {
                name: name.to_string(),
                report_caller: self.config.report_caller,
                development: self.config.development,
                exit: self.exit.clone(),
            },
        );
        LoggerRecord::new(name, destinations, backend)
    }

    /// 解析某个名称的初始级别
    pub fn resolve_level(&self, name: &str) -> Level {
        self.config.level_for(name)
    }

    /// 按前缀查询级别
    pub fn get_levels(&self, prefix: &str) -> HashMap<String, String> {
        self.loggers.get_levels(prefix)
    }

    /// 按前缀修改级别，返回修改的 logger 数量
    pub fn set_levels(&self, prefix: &str, level: &str) -> usize {
        self.loggers.set_levels(prefix, level)
    }

    /// 刷新所有输出器
    pub fn flush(&self) -> io::Result<()> {
        self.writers.flush_all()
    }
}
