// {{{ Imports
use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::Error;
// }}}

/// Format the profile API uses for activity dates, like `16-Oct-2026 18:42`.
pub const ACTIVITY_DATE_FORMAT: &str = "%d-%b-%Y %H:%M";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// {{{ Response types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
	pub date: String,
	pub details: String,
	pub text: String,
}

impl Activity {
	pub fn parsed_date(&self) -> Result<NaiveDateTime, Error> {
		NaiveDateTime::parse_from_str(&self.date, ACTIVITY_DATE_FORMAT)
			.with_context(|| format!("Invalid activity date `{}`", self.date))
	}
}

/// Skill levels as reported by the profile API. The xp is in tenths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillValue {
	pub id: u32,
	pub level: u32,
	pub xp: u64,
	#[serde(default)]
	pub rank: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerProfile {
	pub name: String,
	pub activities: Vec<Activity>,
	#[serde(default)]
	pub skillvalues: Vec<SkillValue>,
}

#[derive(Deserialize)]
struct RawProfile {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	activities: Option<Vec<Activity>>,
	#[serde(default)]
	skillvalues: Option<Vec<SkillValue>>,
}
// }}}
// {{{ Parsing
/// Parses a profile response body.
///
/// Private (or unknown) profiles have no activity list, and are returned as
/// [None]. Bodies which aren't valid json are errors.
pub fn parse_profile(rsn: &str, body: &str) -> Result<Option<PlayerProfile>, Error> {
	let raw: RawProfile = serde_json::from_str(body)
		.with_context(|| format!("Malformed profile response for {rsn}"))?;

	if let Some(error) = raw.error {
		debug!("Profile for {rsn} is unavailable: {error}");
		return Ok(None);
	}

	let Some(activities) = raw.activities else {
		debug!("{rsn}'s profile is private.");
		return Ok(None);
	};

	Ok(Some(PlayerProfile {
		name: raw.name.unwrap_or_else(|| rsn.to_owned()),
		activities,
		skillvalues: raw.skillvalues.unwrap_or_default(),
	}))
}

/// Returns the date of the most recent activity whose details contain `needle`.
pub fn find_activity(profile: &PlayerProfile, needle: &str) -> Result<Option<NaiveDateTime>, Error> {
	profile
		.activities
		.iter()
		.find(|activity| activity.details.contains(needle))
		.map(Activity::parsed_date)
		.transpose()
}

/// Renders the activities of a profile the way the `alog` command shows them.
pub fn format_alog(rsn: &str, profile: Option<&PlayerProfile>) -> String {
	match profile {
		None => format!("{rsn}'s profile is private."),
		Some(profile) => {
			let mut out = format!("Adventurer's Log for {rsn}:\n");
			for activity in &profile.activities {
				out.push_str(&format!(
					"Date: {}      Log Entry: {}\n",
					activity.date, activity.text
				));
			}
			out
		}
	}
}
// }}}
// {{{ Sources
/// Anything player profiles can be fetched from.
pub trait AlogSource {
	/// Fetches the profile of a player, returning [None] for private profiles.
	async fn fetch_profile(&self, rsn: &str) -> Result<Option<PlayerProfile>, Error>;
}

/// Client for the public RuneMetrics profile api.
#[derive(Clone, Debug)]
pub struct RuneMetrics {
	client: reqwest::Client,
	base_url: String,
}

impl RuneMetrics {
	pub fn new(base_url: &str) -> Result<Self, Error> {
		let client = reqwest::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.context("Could not build http client")?;

		Ok(Self {
			client,
			base_url: base_url.to_owned(),
		})
	}

	pub fn profile_url(&self, rsn: &str) -> String {
		format!("{}{}&activities=20", self.base_url, rsn)
	}
}

impl AlogSource for RuneMetrics {
	async fn fetch_profile(&self, rsn: &str) -> Result<Option<PlayerProfile>, Error> {
		let body = self
			.client
			.get(self.profile_url(rsn))
			.send()
			.await
			.and_then(|res| res.error_for_status())
			.map_err(|e| anyhow!("Could not fetch profile for {rsn}: {e}"))?
			.text()
			.await?;

		parse_profile(rsn, &body)
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
pub mod tests {
	use std::collections::HashMap;

	use super::*;

	pub const SAMPLE_PROFILE: &str = r#"{
		"name": "Zezima",
		"skillvalues": [
			{ "level": 99, "xp": 134567890, "rank": 1200, "id": 0 },
			{ "level": 85, "xp": 35000000, "id": 3 }
		],
		"activities": [
			{ "date": "16-Oct-2026 18:42", "details": "I killed 5 boss monsters called:  Telos.", "text": "I killed 5 Telos." },
			{ "date": "14-Oct-2026 09:05", "details": "I have capped at my clan citadel this week.", "text": "Capped at my clan citadel." },
			{ "date": "07-Oct-2026 21:30", "details": "I have capped at my clan citadel this week.", "text": "Capped at my clan citadel." }
		]
	}"#;

	/// Serves canned profiles, keyed by name.
	#[derive(Default)]
	pub struct FakeAlog {
		pub profiles: HashMap<String, Option<PlayerProfile>>,
	}

	impl FakeAlog {
		pub fn with(mut self, rsn: &str, profile: Option<PlayerProfile>) -> Self {
			self.profiles.insert(rsn.to_owned(), profile);
			self
		}
	}

	impl AlogSource for FakeAlog {
		async fn fetch_profile(&self, rsn: &str) -> Result<Option<PlayerProfile>, Error> {
			self.profiles
				.get(rsn)
				.cloned()
				.ok_or_else(|| anyhow!("Connection reset while fetching {rsn}"))
		}
	}

	pub fn sample_profile() -> PlayerProfile {
		parse_profile("Zezima", SAMPLE_PROFILE).unwrap().unwrap()
	}

	#[test]
	fn parses_public_profiles() {
		let profile = sample_profile();
		assert_eq!(profile.name, "Zezima");
		assert_eq!(profile.activities.len(), 3);
		assert_eq!(profile.skillvalues[1].id, 3);
		assert_eq!(profile.skillvalues[1].rank, None);
	}

	#[test]
	fn private_profiles_are_not_errors() -> Result<(), Error> {
		let body = r#"{"error":"PROFILE_PRIVATE","loggedIn":"false"}"#;
		assert_eq!(parse_profile("Zezima", body)?, None);
		assert_eq!(parse_profile("Zezima", r#"{"name":"Zezima"}"#)?, None);
		Ok(())
	}

	#[test]
	fn malformed_bodies_are_errors() {
		assert!(parse_profile("Zezima", "<html>502 Bad Gateway</html>").is_err());
		assert!(parse_profile("Zezima", r#"{"activities": 3}"#).is_err());
	}

	#[test]
	fn finds_most_recent_matching_activity() -> Result<(), Error> {
		let profile = sample_profile();
		let date = find_activity(&profile, "capped")?.unwrap();
		assert_eq!(date.to_string(), "2026-10-14 09:05:00");
		assert_eq!(find_activity(&profile, "quest")?, None);
		Ok(())
	}

	#[test]
	fn invalid_dates_are_errors() {
		let mut profile = sample_profile();
		profile.activities[1].date = "yesterday".to_owned();
		assert!(find_activity(&profile, "capped").is_err());
	}

	#[test]
	fn formats_logs() {
		assert_eq!(format_alog("Zezima", None), "Zezima's profile is private.");

		let profile = sample_profile();
		let out = format_alog("Zezima", Some(&profile));
		assert!(out.starts_with("Adventurer's Log for Zezima:\n"));
		assert!(out.contains("Date: 16-Oct-2026 18:42      Log Entry: I killed 5 Telos.\n"));
	}

	#[test]
	fn builds_profile_urls() -> Result<(), Error> {
		let client = RuneMetrics::new("https://example.com/profile?user=")?;
		assert_eq!(
			client.profile_url("Zezima"),
			"https://example.com/profile?user=Zezima&activities=20"
		);
		Ok(())
	}
}
// }}}
