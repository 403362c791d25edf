use crate::appender::Destination;
use crate::formatter::FormatterKind;
use crate::level::{BackendKind, Level};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use smart_default::SmartDefault;
use std::collections::HashMap;
use std::path::Path;

/// 单个输出目的地配置
///
/// `type` 为 `stdout`、`stderr` 或 `file`（不区分大小写），
/// `options` 仅对 `file` 生效，取值统一按字符串处理。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppenderConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(deserialize_with = "string_map")]
    pub options: HashMap<String, String>,
}

impl AppenderConfig {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            options: HashMap::new(),
        }
    }

    pub fn stdout() -> Self {
        Self::new("stdout")
    }

    pub fn stderr() -> Self {
        Self::new("stderr")
    }

    pub fn file() -> Self {
        Self::new("file")
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// 转换为目的地，未知类型返回 None
    pub fn destination(&self) -> Option<Destination> {
        Destination::from_options(&self.type_name, &self.options)
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// 后端选择：structured/zap 或 text/logrus，其他值按 text 处理
    #[default("text".to_string())]
    pub factory: String,

    /// 名称解析结果为空时使用的 logger 名称
    #[default("root".to_string())]
    pub root_name: String,

    /// 默认级别
    #[default("INFO".to_string())]
    pub root_level: String,

    /// 按名称（前缀）覆盖级别
    pub package_levels: HashMap<String, String>,

    /// normal 或 json
    #[default("normal".to_string())]
    pub formatter: String,

    /// 是否记录调用位置
    #[default(true)]
    pub report_caller: bool,

    /// 开发模式
    pub development: bool,

    /// 输出目的地，按顺序写入
    #[default(vec![AppenderConfig::stdout()])]
    pub appenders: Vec<AppenderConfig>,
}

impl LoggingConfig {
    /// 从 JSON 字符串创建（支持 JSON5 格式）
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(json5::from_str(json_str)?)
    }

    /// 从 YAML 字符串创建
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// 从 TOML 字符串创建
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// 从文件加载，按扩展名选择格式
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" | "json5" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(anyhow!(
                "unsupported config file format: {}",
                path.display()
            )),
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        BackendKind::parse_or_default(&self.factory)
    }

    pub fn formatter_kind(&self) -> FormatterKind {
        FormatterKind::parse_or_default(&self.formatter)
    }

    pub fn root_level(&self) -> Level {
        Level::parse_or_default(&self.root_level)
    }

    /// 配置中的目的地，跳过未知类型
    pub fn destinations(&self) -> Vec<Destination> {
        self.appenders
            .iter()
            .filter_map(AppenderConfig::destination)
            .collect()
    }

    /// 解析某个 logger 的级别
    ///
    /// 精确匹配优先，其次是最长的前缀匹配，最后是 root 级别。
    pub fn level_for(&self, name: &str) -> Level {
        if let Some(level) = self.package_levels.get(name) {
            return Level::parse_or_default(level);
        }

        self.package_levels
            .iter()
            .filter(|(prefix, _)| name.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, level)| Level::parse_or_default(level))
            .unwrap_or_else(|| self.root_level())
    }
}

/// 把任意标量值都读成字符串：`max-file-size: 1024` 与 `"1024"` 等价
fn string_map<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, JsonValue> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                JsonValue::Null => return None,
                JsonValue::String(s) => s,
                JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
                    (Some(i), _) => i.to_string(),
                    // 部分格式把整数读成浮点数
                    (None, Some(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
                    _ => n.to_string(),
                },
                other => other.to_string(),
            };
            Some((key, value))
        })
        .collect())
}
