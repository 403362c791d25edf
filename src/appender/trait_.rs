use std::io;

/// 日志输出器 trait
///
/// 负责把已经格式化好的字节写到目标介质。实现必须是线程安全的，
/// 同一个输出器可能被多个 logger 共享。
pub trait LogAppender: Send + Sync {
    /// 输出日志，返回写入的字节数
    fn append(&self, buf: &[u8]) -> io::Result<usize>;

    /// 刷新缓冲区（默认实现为空操作）
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}
