//! `log` crate 桥接的集成测试
//!
//! `log::set_boxed_logger` 每个进程只能调用一次，所以放在单独的测试文件里。

use logx::{bridge, LoggerFactory, LoggingConfig, MemoryAppender};
use std::sync::Arc;

#[test]
fn test_log_crate_records_are_routed() {
    let mut config = LoggingConfig::default();
    config
        .package_levels
        .insert("bridge_tests::noisy".to_string(), "ERROR".to_string());
    let factory = Arc::new(LoggerFactory::new(config));
    let sink = Arc::new(MemoryAppender::new());
    factory.writers().register("stdout", sink.clone());

    bridge::init(factory.clone()).unwrap();
    assert!(bridge::init(factory.clone()).is_err());

    let line = line!() + 1;
    log::info!("hello {}", "bridge");
    log::debug!("filtered by INFO root level");
    log::warn!(target: "bridge_tests::noisy", "filtered by package level");
    log::error!(target: "bridge_tests::noisy", "kept");
    log::logger().flush();

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("msg=\"hello bridge\""));
    assert!(lines[0].contains(&format!("file=tests/bridge_tests.rs:{}", line)));
    assert!(lines[1].contains("level=error"));
    assert!(lines[1].contains("msg=kept"));

    let mut names = factory.loggers().names();
    names.sort();
    assert_eq!(names, vec!["bridge_tests", "bridge_tests::noisy"]);
}
