use tracing_appender::non_blocking::WorkerGuard;

/// 日志配置 (输出到控制台 + 文件)
///
/// 默认级别 info，可用 `RUST_LOG` 覆盖。返回的 guard 必须持有到进程结束，
/// 否则后台写日志的线程会立即销毁。
pub fn init_logging() -> WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // 文件输出器：每天生成一个新的日志文件 (logs/study.log.2025-xx-xx)
    let file_appender = tracing_appender::rolling::daily("logs", "study.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_thread_ids(true)
        .compact();

    // 文件里不要颜色代码
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
