use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console + file logging. The console layer stays human-readable; the file
/// layer writes JSON lines under `logs/` with daily rotation.
pub fn init_logging() {
    let _ = std::fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", "etl.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::from_default_env()
        .add_directive("jobmarket_scraper=info".parse().expect("valid directive"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(file_writer))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    // The guard flushes buffered lines on drop; leak it so logging lives
    // until process exit
    std::mem::forget(guard);
}
