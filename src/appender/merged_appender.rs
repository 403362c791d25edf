use crate::appender::LogAppender;
use std::io;
use std::sync::Arc;

/// 合并输出器
///
/// 把同一段字节按顺序转发给每一个下游输出器。某个输出器失败不会中断
/// 后续输出器，返回值是最后一个输出器的结果；没有下游时返回 `Ok(0)`。
#[derive(Clone, Default)]
pub struct MergedAppender {
    delegates: Vec<Arc<dyn LogAppender>>,
}

impl MergedAppender {
    pub fn new(delegates: Vec<Arc<dyn LogAppender>>) -> Self {
        Self { delegates }
    }

    pub fn delegates(&self) -> &[Arc<dyn LogAppender>] {
        &self.delegates
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl LogAppender for MergedAppender {
    fn append(&self, buf: &[u8]) -> io::Result<usize> {
        let mut result = Ok(0);
        for delegate in &self.delegates {
            result = delegate.append(buf);
        }
        result
    }

    fn flush(&self) -> io::Result<()> {
        let mut result = Ok(());
        for delegate in &self.delegates {
            result = delegate.flush();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::MemoryAppender;

    struct FailingAppender;

    impl LogAppender for FailingAppender {
        fn append(&self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken sink"))
        }
    }

    #[test]
    fn test_merged_appender_fan_out() {
        let a = Arc::new(MemoryAppender::new());
        let b = Arc::new(MemoryAppender::new());
        let merged = MergedAppender::new(vec![
            a.clone() as Arc<dyn LogAppender>,
            b.clone() as Arc<dyn LogAppender>,
        ]);

        assert_eq!(merged.append(b"hello\n").unwrap(), 6);
        assert_eq!(a.contents(), "hello\n");
        assert_eq!(b.contents(), "hello\n");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merged_appender_empty() {
        let merged = MergedAppender::default();
        assert!(merged.is_empty());
        assert_eq!(merged.append(b"dropped").unwrap(), 0);
        assert!(merged.flush().is_ok());
    }

    #[test]
    fn test_merged_appender_error_does_not_short_circuit() {
        let tail = Arc::new(MemoryAppender::new());
        let merged = MergedAppender::new(vec![
            Arc::new(FailingAppender) as Arc<dyn LogAppender>,
            tail.clone() as Arc<dyn LogAppender>,
        ]);

        // 第一个失败，最后一个成功：报告最后一个的结果
        assert_eq!(merged.append(b"abc").unwrap(), 3);
        assert_eq!(tail.contents(), "abc");
    }

    #[test]
    fn test_merged_appender_reports_last_error() {
        let head = Arc::new(MemoryAppender::new());
        let merged = MergedAppender::new(vec![
            head.clone() as Arc<dyn LogAppender>,
            Arc::new(FailingAppender) as Arc<dyn LogAppender>,
        ]);

        assert!(merged.append(b"abc").is_err());
        assert_eq!(head.contents(), "abc");
    }
}
