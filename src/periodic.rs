use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::context::Error;
use crate::timed;

/// Runs `task` right away, and then once every `period`, forever.
///
/// Failures are logged and do not stop the loop. Runs never overlap: a slow
/// run delays the next tick instead of queueing extra ones.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, mut task: F) -> JoinHandle<()>
where
	F: FnMut() -> Fut + Send + 'static,
	Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
	tokio::spawn(async move {
		info!("Starting periodic task `{name}` every {period:?}");

		let mut interval = tokio::time::interval(period);
		interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			interval.tick().await;
			if let Err(err) = timed!(name, { task().await }) {
				error!("Periodic task `{name}` failed: {err:?}");
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	use anyhow::anyhow;

	use super::*;

	#[tokio::test]
	async fn keeps_running_after_failures() {
		let runs = Arc::new(AtomicUsize::new(0));
		let counter = runs.clone();

		let handle = spawn_periodic("test", Duration::from_millis(5), move || {
			let counter = counter.clone();
			async move {
				let run = counter.fetch_add(1, Ordering::SeqCst);
				if run % 2 == 0 {
					Err(anyhow!("every other run fails"))
				} else {
					Ok(())
				}
			}
		});

		tokio::time::sleep(Duration::from_millis(100)).await;
		handle.abort();

		assert!(runs.load(Ordering::SeqCst) >= 3);
	}
}
