use crate::appender::Destination;
use crate::backend::Backend;
use crate::level::Level;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};

/// 匹配所有 logger 的前缀（不区分大小写）
pub const ROOT_PREFIX: &str = "ROOT";

/// logger 的级别和后端
///
/// 两者总是一起替换，读者不会看到级别和后端不一致的组合。
pub struct LoggerState {
    pub level: Level,
    pub backend: Arc<dyn Backend>,
}

/// 已注册的 logger
pub struct LoggerRecord {
    name: String,
    destinations: Vec<Destination>,
    state: ArcSwap<LoggerState>,
}

impl LoggerRecord {
    pub fn new(
        name: impl Into<String>,
        destinations: Vec<Destination>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let state = LoggerState {
            level: backend.level(),
            backend,
        };
        Self {
            name: name.into(),
            destinations,
            state: ArcSwap::from_pointee(state),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// 当前状态快照
    pub fn state(&self) -> Arc<LoggerState> {
        self.state.load_full()
    }

    pub fn level(&self) -> Level {
        self.state.load().level
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        self.state.load().backend.clone()
    }

    /// 修改级别：基于当前后端重建，并与级别一起原子替换
    pub fn set_level(&self, level: Level) {
        self.state.rcu(|current| {
            Arc::new(LoggerState {
                level,
                backend: current.backend.with_level(level),
            })
        });
    }
}

/// logger 注册表
///
/// 名称到 [`LoggerRecord`] 的映射，支持按前缀查询和批量修改级别。
/// 记录一旦注册就不会被移除，持有者通过同一个 `Arc` 看到后续的级别变化。
#[derive(Default)]
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Arc<LoggerRecord>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册记录；同名记录已存在时返回已有的记录
    pub fn register(&self, record: LoggerRecord) -> Arc<LoggerRecord> {
        let name = record.name.clone();
        self.get_or_insert_with(&name, || record)
    }

    /// 获取记录，不存在时调用 `create` 创建并注册
    pub fn get_or_insert_with(
        &self,
        name: &str,
        create: impl FnOnce() -> LoggerRecord,
    ) -> Arc<LoggerRecord> {
        match self.get_or_try_insert_with(name, || Ok::<_, Infallible>(create())) {
            Ok(record) => record,
            Err(never) => match never {},
        }
    }

    /// 获取记录，不存在时调用 `create` 创建并注册，创建失败时不注册
    ///
    /// `create` 在锁外执行（可能打开文件），并发创建同名记录时只保留
    /// 先插入的一个，其余的直接丢弃。
    pub fn get_or_try_insert_with<E>(
        &self,
        name: &str,
        create: impl FnOnce() -> Result<LoggerRecord, E>,
    ) -> Result<Arc<LoggerRecord>, E> {
        if let Some(record) = self.get(name) {
            return Ok(record);
        }

        let record = Arc::new(create()?);
        let mut loggers = self.loggers.write().unwrap_or_else(PoisonError::into_inner);
        Ok(loggers
            .entry(name.to_string())
            .or_insert(record)
            .clone())
    }

    pub fn get(&self, name: &str) -> Option<Arc<LoggerRecord>> {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// 已注册的名称（已排序）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 查询级别
    ///
    /// `ROOT`（不区分大小写）匹配所有 logger，其他值按区分大小写的字面前缀匹配。
    pub fn get_levels(&self, prefix: &str) -> HashMap<String, String> {
        self.matching(prefix)
            .into_iter()
            .map(|record| (record.name.clone(), record.level().as_str().to_string()))
            .collect()
    }

    /// 批量修改级别，返回修改的 logger 数量
    ///
    /// 未知级别按 INFO 处理。
    pub fn set_levels(&self, prefix: &str, level: &str) -> usize {
        let level = Level::parse_or_default(level);
        let matched = self.matching(prefix);
        for record in &matched {
            record.set_level(level);
        }
        matched.len()
    }

    /// 前缀匹配的记录快照，不持有锁返回
    fn matching(&self, prefix: &str) -> Vec<Arc<LoggerRecord>> {
        let loggers = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
        loggers
            .iter()
            .filter(|(name, _)| matches_prefix(prefix, name))
            .map(|(_, record)| record.clone())
            .collect()
    }
}

fn matches_prefix(prefix: &str, name: &str) -> bool {
    prefix.eq_ignore_ascii_case(ROOT_PREFIX) || name.starts_with(prefix)
}
