use crate::appender::WriterRegistry;
use crate::cfg::LoggingConfig;
use crate::factory::LoggerFactory;
use crate::logger::Logger;
use crate::registry::LoggerRegistry;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// 全局输出器注册表，多次 init 之间共享，同一个文件始终只打开一次
static GLOBAL_WRITERS: Lazy<Arc<WriterRegistry>> = Lazy::new(|| Arc::new(WriterRegistry::new()));

/// 全局 LoggerFactory 单例
///
/// 默认使用文本后端输出到终端
static GLOBAL_FACTORY: Lazy<RwLock<Arc<LoggerFactory>>> =
    Lazy::new(|| RwLock::new(Arc::new(new_factory(LoggingConfig::default()))));

fn new_factory(config: LoggingConfig) -> LoggerFactory {
    LoggerFactory::with_registries(
        config,
        GLOBAL_WRITERS.clone(),
        Arc::new(LoggerRegistry::new()),
    )
}

/// 用新配置初始化全局工厂
///
/// 之前创建的 logger 不受影响，它们仍属于旧的 logger 注册表。
///
/// # 示例
///
/// ```ignore
/// let config = logx::LoggingConfig::from_file("logging.yaml")?;
/// logx::global::init(config);
/// let log = logx::global::logger();
/// ```
pub fn init(config: LoggingConfig) -> Arc<LoggerFactory> {
    set_factory(new_factory(config))
}

/// 替换全局工厂
pub fn set_factory(factory: LoggerFactory) -> Arc<LoggerFactory> {
    let factory = Arc::new(factory);
    *GLOBAL_FACTORY
        .write()
        .unwrap_or_else(PoisonError::into_inner) = factory.clone();
    factory
}

/// 获取全局工厂
pub fn factory() -> Arc<LoggerFactory> {
    GLOBAL_FACTORY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// 以调用位置推导名称获取 logger（全局）
#[track_caller]
pub fn logger() -> Logger {
    factory().logger()
}

/// 按名称获取 logger（全局）
pub fn named(name: &str) -> Logger {
    factory().named(name)
}

/// 按前缀查询级别（全局）
pub fn get_levels(prefix: &str) -> HashMap<String, String> {
    factory().get_levels(prefix)
}

/// 按前缀修改级别（全局）
pub fn set_levels(prefix: &str, level: &str) -> usize {
    factory().set_levels(prefix, level)
}
