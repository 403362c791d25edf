use crate::appender::rolling_file_appender::{
    RollingFileAppenderConfig, DEFAULT_MAX_AGE, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE,
};
use crate::cfg::duration::parse_duration;
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

pub const STDOUT_KEY: &str = "stdout";
pub const STDERR_KEY: &str = "stderr";

pub const DEFAULT_LOG_FILE_DIR: &str = "./logs";
pub const DEFAULT_LOG_FILE_NAME: &str = "application.log";

pub const OPTION_LOG_FILE_DIR: &str = "log-file-dir";
pub const OPTION_LOG_FILE_NAME: &str = "log-file-name";
pub const OPTION_MAX_FILE_SIZE: &str = "max-file-size";
pub const OPTION_MAX_FILE_BACKUPS: &str = "max-file-backups";
pub const OPTION_MAX_FILE_AGE: &str = "max-file-age";
pub const OPTION_LOCAL_TIME: &str = "local-time";
pub const OPTION_COMPRESS: &str = "compress";

/// 日志输出目的地
///
/// 身份由 [`Destination::key`] 决定：标准流使用字面量 `stdout`/`stderr`，
/// 文件使用规范化后的绝对路径。
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Stdout,
    Stderr,
    File(RollingFileAppenderConfig),
}

impl Destination {
    /// 由目录和文件名构造文件目的地，其余参数取默认值
    pub fn file(dir: &str, name: &str) -> Destination {
        Destination::File(RollingFileAppenderConfig {
            file_path: resolve_file_path(dir, name).to_string_lossy().into_owned(),
            ..Default::default()
        })
    }

    /// 从 appender 配置构造目的地
    ///
    /// 类型不区分大小写；未知类型返回 `None`。文件参数解析失败时使用默认值。
    pub fn from_options(kind: &str, options: &HashMap<String, String>) -> Option<Destination> {
        match kind.trim().to_lowercase().as_str() {
            STDOUT_KEY => Some(Destination::Stdout),
            STDERR_KEY => Some(Destination::Stderr),
            "file" => Some(Destination::File(file_config_from_options(options))),
            _ => None,
        }
    }

    /// 注册表中的唯一键
    pub fn key(&self) -> String {
        match self {
            Destination::Stdout => STDOUT_KEY.to_string(),
            Destination::Stderr => STDERR_KEY.to_string(),
            Destination::File(config) => config.file_path.clone(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn file_config_from_options(options: &HashMap<String, String>) -> RollingFileAppenderConfig {
    let option = |key: &str| {
        options
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    };

    let dir = option(OPTION_LOG_FILE_DIR).unwrap_or(DEFAULT_LOG_FILE_DIR);
    let name = option(OPTION_LOG_FILE_NAME).unwrap_or(DEFAULT_LOG_FILE_NAME);

    RollingFileAppenderConfig {
        file_path: resolve_file_path(dir, name).to_string_lossy().into_owned(),
        max_size: option(OPTION_MAX_FILE_SIZE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_SIZE),
        max_backups: option(OPTION_MAX_FILE_BACKUPS)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_BACKUPS),
        max_age: option(OPTION_MAX_FILE_AGE)
            .and_then(|v| parse_duration(v).ok())
            .unwrap_or(DEFAULT_MAX_AGE),
        local_time: option(OPTION_LOCAL_TIME)
            .and_then(parse_bool)
            .unwrap_or(true),
        compress: option(OPTION_COMPRESS)
            .and_then(parse_bool)
            .unwrap_or(true),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 目录 + 文件名 -> 规范化的绝对路径
///
/// 先基于当前工作目录拼接并做词法规范化，再用 `dunce::canonicalize`
/// 解析最近的已存在祖先目录，补回其余部分。目录创建前后得到的键相同。
/// 空字符串使用默认值。
pub fn resolve_file_path(dir: &str, name: &str) -> PathBuf {
    let dir = match dir.trim() {
        "" => DEFAULT_LOG_FILE_DIR,
        dir => dir,
    };
    let name = match name.trim() {
        "" => DEFAULT_LOG_FILE_NAME,
        name => name,
    };

    canonicalize_lenient(&normalize(&absolute(&Path::new(dir).join(name))))
}

fn canonicalize_lenient(path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        if let Ok(canonical) = dunce::canonicalize(ancestor) {
            return match path.strip_prefix(ancestor) {
                Ok(rest) if rest.as_os_str().is_empty() => canonical,
                Ok(rest) => canonical.join(rest),
                Err(_) => path.to_path_buf(),
            };
        }
    }
    path.to_path_buf()
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// 去掉 `.`，按词法折叠 `..`
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
