use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logx::{Level, LogAppender, Logger, LoggerFactory, LoggingConfig, MetadataValue};
use std::io;
use std::sync::Arc;

/// 丢弃所有输出，只测量格式化和分发的开销
struct NullAppender;

impl LogAppender for NullAppender {
    fn append(&self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }
}

/// 创建 benchmark 用的 logger
fn create_benchmark_logger(factory: &str, formatter: &str) -> Logger {
    let factory = LoggerFactory::new(LoggingConfig {
        factory: factory.to_string(),
        formatter: formatter.to_string(),
        root_level: "DEBUG".to_string(),
        ..Default::default()
    });
    factory.writers().register("stdout", Arc::new(NullAppender));
    factory.named("bench")
}

fn benchmark_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("backend");

    for (backend, formatter) in [
        ("text", "normal"),
        ("text", "json"),
        ("structured", "normal"),
        ("structured", "json"),
    ] {
        let logger = create_benchmark_logger(backend, formatter);
        group.bench_function(format!("{}_{}", backend, formatter), |b| {
            b.iter(|| logger.info(black_box("Simple log message")))
        });
    }

    group.finish();
}

fn benchmark_with_metadata(c: &mut Criterion) {
    let logger = create_benchmark_logger("structured", "normal");

    let mut group = c.benchmark_group("with_metadata");

    // 带 3 个 metadata
    group.bench_function("three_metadata", |b| {
        b.iter(|| {
            logger.infom(
                black_box("Message with metadata"),
                vec![
                    ("user_id", black_box(12345i64.into())),
                    ("action", black_box("login".into())),
                    ("success", black_box(true.into())),
                ],
            )
        })
    });

    // 带 10 个 metadata
    group.bench_function("ten_metadata", |b| {
        b.iter(|| {
            let metadata: Vec<(String, MetadataValue)> = (0..10)
                .map(|i| (format!("key_{}", i), black_box(i.into())))
                .collect();
            logger.infom(black_box("Message with many metadata"), metadata)
        })
    });

    group.finish();
}

fn benchmark_levels(c: &mut Criterion) {
    let logger = create_benchmark_logger("text", "normal");
    logger.set_level(Level::Info);

    let mut group = c.benchmark_group("levels");
    group.throughput(Throughput::Elements(1));

    // 关闭的级别应当几乎没有开销
    for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error] {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            b.iter(|| logger.log(level, black_box("Benchmark message")))
        });
    }

    group.finish();
}

fn benchmark_set_levels(c: &mut Criterion) {
    let factory = LoggerFactory::new(LoggingConfig::default());
    factory.writers().register("stdout", Arc::new(NullAppender));
    for i in 0..100 {
        factory.named(&format!("svc.module{}", i));
    }

    c.bench_function("set_levels_100", |b| {
        b.iter(|| factory.set_levels(black_box("svc"), black_box("DEBUG")))
    });
}

criterion_group!(
    benches,
    benchmark_backends,
    benchmark_with_metadata,
    benchmark_levels,
    benchmark_set_levels
);
criterion_main!(benches);
