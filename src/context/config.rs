use std::time::Duration;

use anyhow::Context;

use super::paths::get_var;

pub const DEFAULT_PLAYER_URL: &str =
	"https://apps.runescape.com/runemetrics/profile/profile?user=";

/// Runtime settings which are not paths.
#[derive(Clone, Debug)]
pub struct BotConfig {
	/// Prefix the player name gets appended to when querying a profile.
	pub player_url: String,

	/// Channel cap reports get posted to. The cap sweep is disabled when unset.
	pub cap_channel: Option<u64>,

	pub cap_interval: Duration,
	pub xp_interval: Duration,
}

impl Default for BotConfig {
	fn default() -> Self {
		Self {
			player_url: DEFAULT_PLAYER_URL.to_owned(),
			cap_channel: None,
			cap_interval: Duration::from_secs(600),
			xp_interval: Duration::from_secs(86400),
		}
	}
}

impl BotConfig {
	pub fn from_env() -> anyhow::Result<Self> {
		let mut config = Self::default();

		if let Ok(url) = get_var("MATHBOT_PLAYER_URL") {
			config.player_url = url;
		}

		if let Ok(channel) = get_var("MATHBOT_CAP_CHANNEL") {
			config.cap_channel = Some(
				channel
					.parse()
					.with_context(|| format!("$MATHBOT_CAP_CHANNEL is not a channel id: {channel}"))?,
			);
		}

		Ok(config)
	}
}
