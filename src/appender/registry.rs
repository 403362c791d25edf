use crate::appender::{
    ConsoleAppender, Destination, LogAppender, MergedAppender, RollingFileAppender,
};
use crate::error::Result;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 输出器注册表
///
/// 目的地键（文件绝对路径、`stdout`、`stderr`）到输出器的缓存，保证同一个
/// 目的地在注册表生命周期内只有一个物理输出器。查找、创建、插入在同一把锁内
/// 完成，锁不会跨越实际的写操作。
#[derive(Default)]
pub struct WriterRegistry {
    writers: Mutex<HashMap<String, Arc<dyn LogAppender>>>,
    composed: Mutex<HashMap<String, Arc<MergedAppender>>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取或创建目的地对应的输出器
    ///
    /// 文件无法打开时向 stderr 打印 `Fatal! <错误>` 并退出进程。
    /// 需要自行处理错误时使用 [`WriterRegistry::try_resolve`]。
    pub fn resolve(&self, destination: &Destination) -> Arc<dyn LogAppender> {
        match self.try_resolve(destination) {
            Ok(writer) => writer,
            Err(err) => fatal(err),
        }
    }

    /// 获取或创建目的地对应的输出器，失败时返回错误
    pub fn try_resolve(&self, destination: &Destination) -> Result<Arc<dyn LogAppender>> {
        let mut writers = self.writers();
        Self::resolve_locked(&mut writers, destination)
    }

    fn resolve_locked(
        writers: &mut HashMap<String, Arc<dyn LogAppender>>,
        destination: &Destination,
    ) -> Result<Arc<dyn LogAppender>> {
        let key = destination.key();
        if let Some(writer) = writers.get(&key) {
            return Ok(writer.clone());
        }

        let writer: Arc<dyn LogAppender> = match destination {
            Destination::Stdout => Arc::new(ConsoleAppender::stdout()),
            Destination::Stderr => Arc::new(ConsoleAppender::stderr()),
            Destination::File(config) => Arc::new(RollingFileAppender::new(config.clone())?),
        };
        writers.insert(key, writer.clone());
        Ok(writer)
    }

    /// 把一组目的地合并成一个输出器，并以 `name` 登记
    ///
    /// 任一文件无法打开时打印 `Fatal! <错误>` 并退出进程。
    pub fn compose(&self, name: &str, destinations: &[Destination]) -> Arc<MergedAppender> {
        match self.try_compose(name, destinations) {
            Ok(merged) => merged,
            Err(err) => fatal(err),
        }
    }

    /// 把一组目的地合并成一个输出器，失败时返回错误
    pub fn try_compose(&self, name: &str, destinations: &[Destination]) -> Result<Arc<MergedAppender>> {
        let delegates = {
            let mut writers = self.writers();
            destinations
                .iter()
                .map(|destination| Self::resolve_locked(&mut writers, destination))
                .collect::<Result<Vec<_>>>()?
        };

        let merged = Arc::new(MergedAppender::new(delegates));
        self.composed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), merged.clone());
        Ok(merged)
    }

    /// 预先为某个键注册输出器（例如用内存输出器接管 `stdout`），返回被替换的输出器
    ///
    /// 应在创建 logger 之前调用。已经合并过的输出器仍然持有旧实例，
    /// 只有之后的 `resolve`/`compose` 才会拿到新注册的输出器。
    pub fn register(
        &self,
        key: impl Into<String>,
        writer: Arc<dyn LogAppender>,
    ) -> Option<Arc<dyn LogAppender>> {
        self.writers().insert(key.into(), writer)
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn LogAppender>> {
        self.writers().get(key).cloned()
    }

    /// 按 logger 名称查找合并输出器
    pub fn composed(&self, name: &str) -> Option<Arc<MergedAppender>> {
        self.composed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// 已创建的目的地键（已排序）
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.writers().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// 刷新所有输出器，返回最后一个错误
    pub fn flush_all(&self) -> io::Result<()> {
        let writers: Vec<Arc<dyn LogAppender>> = self.writers().values().cloned().collect();
        let mut result = Ok(());
        for writer in writers {
            if let Err(err) = writer.flush() {
                result = Err(err);
            }
        }
        result
    }

    fn writers(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn LogAppender>>> {
        self.writers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn fatal(err: impl std::fmt::Display) -> ! {
    eprintln!("Fatal! {}", err);
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::{MemoryAppender, RollingFileAppenderConfig};
    use crate::error::LogError;
    use tempfile::TempDir;

    fn file_destination(dir: &TempDir, name: &str) -> Destination {
        Destination::file(&dir.path().to_string_lossy(), name)
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let registry = WriterRegistry::new();
        let destination = file_destination(&temp_dir, "app.log");

        let a = registry.resolve(&destination);
        let b = registry.resolve(&destination);
        assert!(Arc::ptr_eq(&a, &b));

        let stdout_a = registry.resolve(&Destination::Stdout);
        let stdout_b = registry.resolve(&Destination::Stdout);
        assert!(Arc::ptr_eq(&stdout_a, &stdout_b));
        assert!(!Arc::ptr_eq(&stdout_a, &registry.resolve(&Destination::Stderr)));

        assert_eq!(registry.keys().len(), 3);
    }

    #[test]
    fn test_resolve_same_file_different_spelling() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
        let registry = WriterRegistry::new();

        let plain = file_destination(&temp_dir, "app.log");
        let dotted = Destination::file(
            &format!("{}/sub/../.", temp_dir.path().to_string_lossy()),
            "app.log",
        );
        assert!(Arc::ptr_eq(&registry.resolve(&plain), &registry.resolve(&dotted)));
        assert_eq!(registry.keys().len(), 1);
    }

    #[test]
    fn test_try_resolve_error() {
        let temp_dir = TempDir::new().unwrap();
        // 用普通文件占住目录的位置，使创建目录失败
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let registry = WriterRegistry::new();
        let destination = Destination::File(RollingFileAppenderConfig {
            file_path: blocker.join("app.log").to_string_lossy().to_string(),
            ..Default::default()
        });

        assert!(matches!(registry.try_resolve(&destination), Err(LogError::Io(_))));
        assert!(registry.keys().is_empty());
        assert!(registry.try_compose("svc", &[destination]).is_err());
        assert!(registry.composed("svc").is_none());
    }

    #[test]
    fn test_compose_fans_out_in_order() {
        let registry = WriterRegistry::new();
        let first = Arc::new(MemoryAppender::new());
        let second = Arc::new(MemoryAppender::new());
        registry.register("stdout", first.clone());
        registry.register("stderr", second.clone());

        let merged = registry.compose("svc.api", &[Destination::Stdout, Destination::Stderr]);
        assert_eq!(merged.len(), 2);
        merged.append(b"payload\n").unwrap();

        assert_eq!(first.contents(), "payload\n");
        assert_eq!(second.contents(), "payload\n");

        let looked_up = registry.composed("svc.api").unwrap();
        assert!(Arc::ptr_eq(&merged, &looked_up));
        assert!(registry.composed("svc.other").is_none());
    }

    #[test]
    fn test_compose_shares_file_writer() {
        let temp_dir = TempDir::new().unwrap();
        let registry = WriterRegistry::new();
        let destination = file_destination(&temp_dir, "shared.log");

        let a = registry.compose("a", &[destination.clone()]);
        let b = registry.compose("b", &[destination.clone()]);
        assert!(Arc::ptr_eq(&a.delegates()[0], &b.delegates()[0]));

        a.append(b"from a\n").unwrap();
        b.append(b"from b\n").unwrap();
        registry.flush_all().unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("shared.log")).unwrap();
        assert_eq!(content, "from a\nfrom b\n");
    }

    #[test]
    fn test_compose_name_does_not_collide_with_destination_key() {
        let registry = WriterRegistry::new();
        let sink = Arc::new(MemoryAppender::new());
        registry.register("stdout", sink.clone());

        // logger 名称恰好叫 stdout 时不能覆盖标准输出
        registry.compose("stdout", &[Destination::Stdout]);
        let stdout = registry.get("stdout").unwrap();
        stdout.append(b"x").unwrap();
        assert_eq!(sink.contents(), "x");
    }

    #[test]
    fn test_register_and_get() {
        let registry = WriterRegistry::new();
        assert!(registry.get("capture").is_none());

        let sink = Arc::new(MemoryAppender::new());
        registry.register("capture", sink);
        assert!(registry.get("capture").is_some());
        assert_eq!(registry.keys(), vec!["capture".to_string()]);
    }

    #[test]
    fn test_register_replaces_only_for_later_compose() {
        let registry = WriterRegistry::new();
        let first = Arc::new(MemoryAppender::new());
        let second = Arc::new(MemoryAppender::new());

        assert!(registry.register("stdout", first.clone()).is_none());
        let before = registry.compose("svc.a", &[Destination::Stdout]);

        let replaced = registry.register("stdout", second.clone()).unwrap();
        assert!(Arc::ptr_eq(&replaced, &(first.clone() as Arc<dyn LogAppender>)));
        let after = registry.compose("svc.b", &[Destination::Stdout]);

        before.append(b"old\n").unwrap();
        after.append(b"new\n").unwrap();
        assert_eq!(first.contents(), "old\n");
        assert_eq!(second.contents(), "new\n");
    }

    #[test]
    fn test_concurrent_resolve_creates_single_writer() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Arc::new(WriterRegistry::new());
        let destination = file_destination(&temp_dir, "race.log");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let destination = destination.clone();
                std::thread::spawn(move || registry.resolve(&destination))
            })
            .collect();
        let writers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for writer in &writers[1..] {
            assert!(Arc::ptr_eq(&writers[0], writer));
        }
        assert_eq!(registry.keys().len(), 1);
    }
}
