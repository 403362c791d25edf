/// 日志宏模块
///
/// 提供自动捕获文件和行号信息的日志宏，级别关闭时不会构造字段。
///
/// # 示例
///
/// ```ignore
/// use logx::{info, logger, LoggerFactory, LoggingConfig};
///
/// let factory = LoggerFactory::new(LoggingConfig::default());
/// let log = logger!(factory);
///
/// // 简单日志
/// info!(log, "application started");
///
/// // 带 metadata 的日志
/// info!(log, "user logged in", "user_id" => 12345, "username" => "alice");
/// ```

#[doc(hidden)]
#[macro_export]
macro_rules! __logx_log {
    ($logger:expr, $level:expr, $msg:expr $(, $key:expr => $value:expr)*) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log_at(
                level,
                ::std::convert::AsRef::<str>::as_ref(&$msg),
                &[$((
                    ::std::string::String::from($key),
                    $crate::MetadataValue::from($value),
                )),*],
                $crate::CallSite::new(file!(), line!()),
            );
        }
    }};
}

/// 记录 TRACE 级别日志
///
/// ```ignore
/// trace!(logger, "entering function");
/// trace!(logger, "function call", "function" => "process_user", "user_id" => 12345);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__logx_log!($logger, $crate::Level::Trace, $msg $(, $key => $value)*)
    };
}

/// 记录 DEBUG 级别日志
///
/// ```ignore
/// debug!(logger, "processing", "endpoint" => "/api/users", "method" => "GET");
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__logx_log!($logger, $crate::Level::Debug, $msg $(, $key => $value)*)
    };
}

/// 记录 INFO 级别日志
///
/// ```ignore
/// info!(logger, "user logged in");
/// info!(logger, "user action", "user_id" => 12345, "action" => "login");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__logx_log!($logger, $crate::Level::Info, $msg $(, $key => $value)*)
    };
}

/// 记录 WARN 级别日志
///
/// ```ignore
/// warn!(logger, "slow query", "duration_ms" => 1500, "threshold_ms" => 1000);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__logx_log!($logger, $crate::Level::Warn, $msg $(, $key => $value)*)
    };
}

/// 记录 ERROR 级别日志
///
/// ```ignore
/// error!(logger, "query failed", "error_code" => "CONN001", "retry_count" => 3);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__logx_log!($logger, $crate::Level::Error, $msg $(, $key => $value)*)
    };
}

/// 以当前模块路径为名称创建 logger
///
/// ```ignore
/// let log = logger!(factory);
/// assert_eq!(log.name(), module_path!());
/// ```
#[macro_export]
macro_rules! logger {
    ($factory:expr) => {
        $factory.new_logger(&$crate::Caller::new(
            ::std::option::Option::Some(module_path!()),
            file!(),
            line!(),
        ))
    };
}
