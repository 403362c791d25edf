use crate::appender::LogAppender;
use crate::cfg::duration::HumanDur;
use crate::error::{LogError, Result};
use chrono::{Local, NaiveDateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use smart_default::SmartDefault;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// 备份文件名中的时间格式，例如 `application-2024-03-01T10-20-30.123.log`
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;
pub const DEFAULT_MAX_BACKUPS: usize = 20;
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(72 * 3600);

/// RollingFileAppender 配置
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault)]
#[serde(default, rename_all = "kebab-case")]
pub struct RollingFileAppenderConfig {
    /// 日志文件路径
    #[default("./logs/application.log".to_string())]
    pub file_path: String,

    /// 单个文件最大大小（字节），0 表示使用默认值
    #[default(DEFAULT_MAX_SIZE)]
    pub max_size: u64,

    /// 保留的最大备份数量，0 表示不按数量清理
    #[default(DEFAULT_MAX_BACKUPS)]
    pub max_backups: usize,

    /// 备份最长保留时间，0 表示不按时间清理
    #[default(DEFAULT_MAX_AGE)]
    #[serde_as(as = "HumanDur")]
    pub max_age: Duration,

    /// 备份文件名使用本地时间（否则使用 UTC）
    #[default(true)]
    pub local_time: bool,

    /// 是否 gzip 压缩备份文件
    #[default(true)]
    pub compress: bool,
}

/// 当前文件信息
struct ActiveFile {
    file: File,
    size: u64,
}

/// 备份文件信息
struct Backup {
    path: PathBuf,
    timestamp: NaiveDateTime,
    compressed: bool,
}

impl Backup {
    /// 去掉压缩后缀的文件名，同一个备份的压缩版和原始版共享这个名字
    fn base_name(&self) -> String {
        let name = self.path.to_string_lossy();
        name.strip_suffix(COMPRESS_SUFFIX)
            .unwrap_or(&name)
            .to_string()
    }
}

/// 滚动文件输出器
///
/// 写入会让文件超过 `max_size` 时，把当前文件重命名为
/// `<stem>-<timestamp><ext>` 并重新打开一个空文件，随后清理超出数量
/// 或超过保留时间的备份，并压缩剩下未压缩的备份。
///
/// 清理和压缩在释放当前文件的锁之后进行，只和其他清理互斥，
/// 不会阻塞写入。
pub struct RollingFileAppender {
    config: RollingFileAppenderConfig,
    path: PathBuf,
    dir: PathBuf,
    stem: String,
    ext: String,
    current: Mutex<ActiveFile>,
    mill: Mutex<()>,
}

impl RollingFileAppender {
    pub fn new(config: RollingFileAppenderConfig) -> Result<Self> {
        let path = PathBuf::from(&config.file_path);
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LogError::InvalidDestination(config.file_path.clone()))?
            .to_string();
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // 确保父目录存在
        fs::create_dir_all(&dir)?;

        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        let (stem, ext) = split_file_name(&file_name);

        Ok(Self {
            config,
            path,
            dir,
            stem,
            ext,
            current: Mutex::new(ActiveFile { file, size }),
            mill: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &RollingFileAppenderConfig {
        &self.config
    }

    /// 当前正在写入的文件
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 当前文件大小
    pub fn size(&self) -> u64 {
        self.lock().size
    }

    /// 立即切分
    pub fn rotate(&self) -> io::Result<()> {
        {
            let mut current = self.lock();
            self.rotate_locked(&mut current)?;
        }
        self.mill_backups();
        Ok(())
    }

    fn max_size(&self) -> u64 {
        if self.config.max_size == 0 {
            DEFAULT_MAX_SIZE
        } else {
            self.config.max_size
        }
    }

    fn lock(&self) -> MutexGuard<'_, ActiveFile> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> NaiveDateTime {
        if self.config.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }

    fn backup_path(&self, timestamp: NaiveDateTime) -> PathBuf {
        self.dir.join(format!(
            "{}-{}{}",
            self.stem,
            timestamp.format(BACKUP_TIME_FORMAT),
            self.ext
        ))
    }

    /// 同一毫秒内多次切分时顺延时间戳，避免覆盖已有备份（含已压缩的）
    fn free_backup_path(&self) -> PathBuf {
        let mut timestamp = self.now();
        loop {
            let path = self.backup_path(timestamp);
            let mut compressed = path.as_os_str().to_owned();
            compressed.push(COMPRESS_SUFFIX);
            if !path.exists() && !Path::new(&compressed).exists() {
                return path;
            }
            timestamp += chrono::Duration::milliseconds(1);
        }
    }

    /// 执行切分，调用方必须持有当前文件的锁
    fn rotate_locked(&self, current: &mut ActiveFile) -> io::Result<()> {
        current.file.flush()?;

        match fs::rename(&self.path, self.free_backup_path()) {
            Ok(()) => {}
            // 文件被外部删除时直接重新创建
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }

        current.file = open_append(&self.path)?;
        current.size = 0;
        Ok(())
    }

    /// 清理失败不影响写入
    fn mill_backups(&self) {
        let _guard = self.mill.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = self.mill();
    }

    /// 清理和压缩备份文件
    fn mill(&self) -> io::Result<()> {
        let mut backups = self.backups()?;
        let mut removals = Vec::new();

        if self.config.max_backups > 0 {
            let mut preserved = HashSet::new();
            let max_backups = self.config.max_backups;
            backups.retain(|backup| {
                preserved.insert(backup.base_name());
                if preserved.len() > max_backups {
                    removals.push(backup.path.clone());
                    false
                } else {
                    true
                }
            });
        }

        if !self.config.max_age.is_zero() {
            if let Ok(max_age) = chrono::Duration::from_std(self.config.max_age) {
                let cutoff = self.now() - max_age;
                backups.retain(|backup| {
                    if backup.timestamp < cutoff {
                        removals.push(backup.path.clone());
                        false
                    } else {
                        true
                    }
                });
            }
        }

        for path in removals {
            let _ = fs::remove_file(path);
        }

        // 单个文件压缩失败时继续处理其余备份，返回最后一个错误
        let mut result = Ok(());
        if self.config.compress {
            for backup in backups.iter().filter(|backup| !backup.compressed) {
                if let Err(err) = compress_file(&backup.path) {
                    result = Err(err);
                }
            }
        }

        result
    }

    /// 列出所有备份，最新的在前
    fn backups(&self) -> io::Result<Vec<Backup>> {
        let prefix = format!("{}-", self.stem);
        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            let (name, compressed) = match name.strip_suffix(COMPRESS_SUFFIX) {
                Some(stripped) => (stripped, true),
                None => (name, false),
            };
            let timestamp = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(self.ext.as_str()))
                .and_then(|ts| NaiveDateTime::parse_from_str(ts, BACKUP_TIME_FORMAT).ok());

            if let Some(timestamp) = timestamp {
                backups.push(Backup {
                    path: entry.path(),
                    timestamp,
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }
}

impl LogAppender for RollingFileAppender {
    fn append(&self, buf: &[u8]) -> io::Result<usize> {
        let max_size = self.max_size();
        let len = buf.len() as u64;
        if len > max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                LogError::WriteTooLarge {
                    size: buf.len(),
                    max_size,
                },
            ));
        }

        let rotated = {
            let mut current = self.lock();
            let rotated = current.size + len > max_size;
            if rotated {
                self.rotate_locked(&mut current)?;
            }
            current.file.write_all(buf)?;
            current.size += len;
            rotated
        };

        if rotated {
            self.mill_backups();
        }
        Ok(buf.len())
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().file.flush()
    }
}

impl TryFrom<RollingFileAppenderConfig> for RollingFileAppender {
    type Error = LogError;

    fn try_from(config: RollingFileAppenderConfig) -> Result<Self> {
        Self::new(config)
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// `application.log` -> (`application`, `.log`)
fn split_file_name(file_name: &str) -> (String, String) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => (file_name[..idx].to_string(), file_name[idx..].to_string()),
        _ => (file_name.to_string(), String::new()),
    }
}

/// 压缩文件，成功后删除原文件
fn compress_file(path: &Path) -> io::Result<()> {
    let mut compressed_path = path.as_os_str().to_owned();
    compressed_path.push(COMPRESS_SUFFIX);

    let mut source = File::open(path)?;
    let target = File::create(PathBuf::from(compressed_path))?;
    let mut encoder = GzEncoder::new(target, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
}
