use crate::appender::LogAppender;
use std::io;
use std::sync::{Mutex, PoisonError};

/// 内存输出器
///
/// 把所有写入保存在内存里，用于捕获日志输出（测试、诊断页面等）。
#[derive(Default)]
pub struct MemoryAppender {
    buffer: Mutex<Vec<u8>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的全部内容
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// 按行拆分后的内容
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogAppender for MemoryAppender {
    fn append(&self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }
}
