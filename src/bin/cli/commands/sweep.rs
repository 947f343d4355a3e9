use chrono::Utc;

use mathbot::context::{Error, UserContext};
use mathbot::runescape::caps::check_caps;
use mathbot::runescape::xp::snapshot_xp;

/// Prints the caps the next sweep would report. Nothing gets recorded, so the
/// bot still posts them to the cap channel.
pub async fn run_caps() -> Result<(), Error> {
	let data = UserContext::new()?;
	let pending = check_caps(&data, &data.alog, Utc::now().naive_utc()).await?;

	if pending.is_empty() {
		println!("No new caps.");
	}

	for record in pending {
		println!("{record}");
	}

	Ok(())
}

pub async fn run_xp() -> Result<(), Error> {
	let data = UserContext::new()?;
	let saved = snapshot_xp(&data, &data.alog, Utc::now().naive_utc()).await?;
	println!("Saved {saved} xp snapshots");
	Ok(())
}
