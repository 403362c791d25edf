use crate::factory::LoggerFactory;
use crate::level::Level;
use crate::record::CallSite;
use std::sync::Arc;

/// `log` crate 桥接
///
/// 按记录的 target 取得同名 logger（首次使用时由工厂创建），
/// 级别判断以该 logger 的当前级别为准，调用位置取记录里的文件和行号。
pub struct LogBridge {
    factory: Arc<LoggerFactory>,
}

impl LogBridge {
    pub fn new(factory: Arc<LoggerFactory>) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &Arc<LoggerFactory> {
        &self.factory
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.factory
            .named(metadata.target())
            .is_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let logger = self.factory.named(record.target());
        let level = Level::from(record.level());
        if !logger.is_enabled(level) {
            return;
        }

        let caller = CallSite::new(
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
        );
        logger.log_at(level, &record.args().to_string(), &[], caller);
    }

    fn flush(&self) {
        let _ = self.factory.flush();
    }
}

/// 把 `log` crate 的输出接入工厂，全局最大级别设为 TRACE，实际过滤由各 logger 完成
pub fn init(factory: Arc<LoggerFactory>) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(factory)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
