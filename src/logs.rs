use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::context::paths::MathbotPaths;
use crate::context::Error;

/// Installs the global subscriber, writing to stderr and to the log directory.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. The returned guard
/// must be kept alive for the file writer to flush.
pub fn init_logging(paths: &MathbotPaths) -> Result<WorkerGuard, Error> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	let file_appender = tracing_appender::rolling::never(paths.log_dir(), paths.log_file_name());
	let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

	let subscriber = tracing_subscriber::registry()
		.with(filter)
		.with(fmt::Layer::new().with_writer(std::io::stderr))
		.with(fmt::Layer::new().with_writer(non_blocking).with_ansi(false));

	tracing::subscriber::set_global_default(subscriber)?;

	Ok(guard)
}
