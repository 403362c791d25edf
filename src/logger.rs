use crate::level::Level;
use crate::record::{CallSite, MetadataValue};
use crate::registry::{LoggerRecord, LoggerRegistry};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 应用持有的 logger
///
/// 轻量句柄，克隆成本很低。级别变化（包括通过注册表的批量修改）
/// 对所有持有同一名称的句柄立即可见。
///
/// 所有输出方法都标注了 `#[track_caller]`，记录的调用位置是应用代码中的调用点。
#[derive(Clone)]
pub struct Logger {
    record: Arc<LoggerRecord>,
    registry: Arc<LoggerRegistry>,
}

impl Logger {
    pub fn new(record: Arc<LoggerRecord>, registry: Arc<LoggerRegistry>) -> Self {
        Self { record, registry }
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }

    /// 当前级别
    pub fn level(&self) -> Level {
        self.record.level()
    }

    pub fn record(&self) -> &Arc<LoggerRecord> {
        &self.record
    }

    /// 只修改当前 logger 的级别
    pub fn set_level(&self, level: Level) {
        self.record.set_level(level);
    }

    /// 按前缀查询级别，见 [`LoggerRegistry::get_levels`]
    pub fn get_levels(&self, prefix: &str) -> HashMap<String, String> {
        self.registry.get_levels(prefix)
    }

    /// 按前缀修改级别，见 [`LoggerRegistry::set_levels`]
    pub fn set_levels(&self, prefix: &str, level: &str) -> usize {
        self.registry.set_levels(prefix, level)
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.record.level().enables(level)
    }

    pub fn is_trace_enabled(&self) -> bool {
        self.is_enabled(Level::Trace)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled(Level::Debug)
    }

    pub fn is_info_enabled(&self) -> bool {
        self.is_enabled(Level::Info)
    }

    pub fn is_warn_enabled(&self) -> bool {
        self.is_enabled(Level::Warn)
    }

    pub fn is_error_enabled(&self) -> bool {
        self.is_enabled(Level::Error)
    }

    pub fn is_dpanic_enabled(&self) -> bool {
        self.is_enabled(Level::DPanic)
    }

    pub fn is_panic_enabled(&self) -> bool {
        self.is_enabled(Level::Panic)
    }

    pub fn is_fatal_enabled(&self) -> bool {
        self.is_enabled(Level::Fatal)
    }

    /// 以显式的调用位置输出日志
    ///
    /// 用于转发其他日志系统的记录或封装自己的日志函数。
    pub fn log_at(
        &self,
        level: Level,
        message: &str,
        fields: &[(String, MetadataValue)],
        caller: CallSite,
    ) {
        let state = self.record.state();
        if level < Level::DPanic && !state.backend.enabled(level) {
            return;
        }
        state.backend.log(level, message, fields, Some(&caller));
    }

    #[track_caller]
    fn dispatch(&self, level: Level, message: &str, fields: &[(String, MetadataValue)]) {
        let state = self.record.state();
        // 关闭的级别不捕获调用位置，避免分配
        if level < Level::DPanic && !state.backend.enabled(level) {
            return;
        }
        let caller = CallSite::capture();
        state.backend.log(level, message, fields, Some(&caller));
    }

    /// 输出指定级别的日志
    #[track_caller]
    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        self.dispatch(level, message.as_ref(), &[]);
    }

    /// 输出指定级别的日志（带 metadata）
    ///
    /// # 示例
    ///
    /// ```ignore
    /// logger.logm(Level::Info, "user logged in", vec![
    ///     ("user_id", 12345.into()),
    ///     ("username", "alice".into()),
    /// ]);
    /// ```
    #[track_caller]
    pub fn logm<K>(
        &self,
        level: Level,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) where
        K: Into<String>,
    {
        if level < Level::DPanic && !self.is_enabled(level) {
            return;
        }
        let fields: Vec<(String, MetadataValue)> = metadata
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        self.dispatch(level, message.as_ref(), &fields);
    }

    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.dispatch(Level::Trace, message.as_ref(), &[]);
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.dispatch(Level::Debug, message.as_ref(), &[]);
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.dispatch(Level::Info, message.as_ref(), &[]);
    }

    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.dispatch(Level::Warn, message.as_ref(), &[]);
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.dispatch(Level::Error, message.as_ref(), &[]);
    }

    /// 结构化后端在开发模式下 panic，文本后端总是 panic
    #[track_caller]
    pub fn dpanic(&self, message: impl AsRef<str>) {
        self.dispatch(Level::DPanic, message.as_ref(), &[]);
    }

    /// 输出后 panic
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>) {
        self.dispatch(Level::Panic, message.as_ref(), &[]);
    }

    /// 输出、刷新后退出进程
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.dispatch(Level::Fatal, message.as_ref(), &[]);
    }

    #[track_caller]
    pub fn tracem<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::Trace, message, metadata);
    }

    #[track_caller]
    pub fn debugm<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::Debug, message, metadata);
    }

    /// # 示例
    ///
    /// ```ignore
    /// logger.infom("user logged in", vec![
    ///     ("user_id", 12345.into()),
    ///     ("username", "alice".into()),
    /// ]);
    /// ```
    #[track_caller]
    pub fn infom<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::Info, message, metadata);
    }

    #[track_caller]
    pub fn warnm<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::Warn, message, metadata);
    }

    #[track_caller]
    pub fn errorm<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::Error, message, metadata);
    }

    #[track_caller]
    pub fn dpanicm<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::DPanic, message, metadata);
    }

    #[track_caller]
    pub fn panicm<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::Panic, message, metadata);
    }

    #[track_caller]
    pub fn fatalm<K: Into<String>>(
        &self,
        message: impl AsRef<str>,
        metadata: impl IntoIterator<Item = (K, MetadataValue)>,
    ) {
        self.logm(Level::Fatal, message, metadata);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .finish()
    }
}
