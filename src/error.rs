use thiserror::Error;

/// 日志子系统错误类型
///
/// 普通的日志输出接口从不返回错误，这里的错误只出现在资源构造
/// （打开滚动日志文件等）和配置加载路径上。
#[derive(Error, Debug)]
pub enum LogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("write length {size} exceeds maximum file size {max_size}")]
    WriteTooLarge { size: usize, max_size: u64 },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LogError::WriteTooLarge {
            size: 20,
            max_size: 10,
        };
        assert_eq!(
            err.to_string(),
            "write length 20 exceeds maximum file size 10"
        );

        let err = LogError::InvalidDestination("kafka".to_string());
        assert_eq!(err.to_string(), "invalid destination: kafka");
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LogError = io.into();
        assert!(matches!(err, LogError::Io(_)));
    }
}
