//! Daily xp history of roster members.

// {{{ Imports
use std::cmp::Reverse;

use anyhow::Context;
use chrono::NaiveDateTime;
use rusqlite::OptionalExtension;
use tracing::{info, warn};

use crate::context::{Error, UserContext};
use crate::runescape::alog::{AlogSource, SkillValue};
use crate::runescape::roster;
use crate::runescape::skills::{format_xp, Skill};
// }}}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpSnapshot {
	pub rsn: String,
	pub recorded_at: NaiveDateTime,
	pub skills: Vec<SkillValue>,
}

impl XpSnapshot {
	pub fn skill(&self, skill: &Skill) -> Option<&SkillValue> {
		self.skills.iter().find(|value| value.id == skill.id)
	}

	/// Renders a single skill of this snapshot as shown by the `skill` command.
	pub fn describe(&self, skill: &Skill) -> String {
		match self.skill(skill) {
			Some(value) => format!(
				"{} has {} {} with {} XP.",
				self.rsn,
				value.level,
				skill.title(),
				format_xp(value.xp)
			),
			None => format!("No {} data recorded for {}.", skill.title(), self.rsn),
		}
	}
}

// {{{ Standings
/// Where a player stands in a single skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillStanding {
	pub rsn: String,
	pub level: u32,
	pub xp: u64,
	pub rank: Option<u64>,
}

/// Orders players by their rank in `skill`, unranked players last.
///
/// Snapshots without any data for the skill are left out.
pub fn rank_standings(snapshots: &[XpSnapshot], skill: &Skill) -> Vec<SkillStanding> {
	let mut standings: Vec<_> = snapshots
		.iter()
		.filter_map(|snapshot| {
			let value = snapshot.skill(skill)?;
			Some(SkillStanding {
				rsn: snapshot.rsn.clone(),
				level: value.level,
				xp: value.xp,
				rank: value.rank,
			})
		})
		.collect();

	standings.sort_by_key(|standing| (standing.rank.is_none(), standing.rank, Reverse(standing.xp)));
	standings
}
// }}}
// {{{ Storage
pub fn save_snapshot(ctx: &UserContext, snapshot: &XpSnapshot) -> Result<(), Error> {
	let skills = serde_json::to_string(&snapshot.skills)?;
	ctx.db
		.get()?
		.prepare_cached("INSERT INTO xp(rsn, dtg, skills) VALUES (?, ?, ?)")?
		.execute((&snapshot.rsn, snapshot.recorded_at, skills))?;

	Ok(())
}

pub fn latest_snapshot(ctx: &UserContext, rsn: &str) -> Result<Option<XpSnapshot>, Error> {
	let row: Option<(String, NaiveDateTime, String)> = ctx
		.db
		.get()?
		.prepare_cached(
			"
        SELECT rsn, dtg, skills FROM xp
        WHERE rsn = ?
        ORDER BY dtg DESC
        LIMIT 1
      ",
		)?
		.query_row([rsn], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
		.optional()?;

	row.map(|(rsn, recorded_at, skills)| {
		let skills = serde_json::from_str(&skills)
			.with_context(|| format!("Corrupted xp snapshot for {rsn}"))?;
		Ok(XpSnapshot {
			rsn,
			recorded_at,
			skills,
		})
	})
	.transpose()
}
// }}}
// {{{ Sweep
/// Records the current skills of every public roster member, returning how
/// many snapshots were saved.
pub async fn snapshot_xp(
	ctx: &UserContext,
	source: &impl AlogSource,
	now: NaiveDateTime,
) -> Result<usize, Error> {
	let mut saved = 0;

	for rsn in roster::list(ctx)? {
		let profile = match source.fetch_profile(&rsn).await {
			Ok(Some(profile)) if !profile.skillvalues.is_empty() => profile,
			Ok(_) => continue,
			Err(err) => {
				warn!("Skipping xp for {rsn}: {err:#}");
				continue;
			}
		};

		save_snapshot(
			ctx,
			&XpSnapshot {
				rsn,
				recorded_at: now,
				skills: profile.skillvalues,
			},
		)?;
		saved += 1;
	}

	info!("Saved {saved} xp snapshots");
	Ok(saved)
}
// }}}
// {{{ Tests
#[cfg(test)]
mod tests {
	use chrono::TimeDelta;

	use super::*;
	use crate::context::testing::get_test_context;
	use crate::runescape::alog::tests::{sample_profile, FakeAlog};

	fn now() -> NaiveDateTime {
		NaiveDateTime::parse_from_str("2026-10-17 00:00", "%Y-%m-%d %H:%M").unwrap()
	}

	#[tokio::test]
	async fn sweeps_public_profiles() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		for rsn in ["Zezima", "Private", "Offline"] {
			roster::add(&ctx, rsn, None)?;
		}

		let source = FakeAlog::default()
			.with("Zezima", Some(sample_profile()))
			.with("Private", None);

		assert_eq!(snapshot_xp(&ctx, &source, now()).await?, 1);
		assert_eq!(latest_snapshot(&ctx, "Private")?, None);

		let snapshot = latest_snapshot(&ctx, "zezima")?.unwrap();
		assert_eq!(snapshot.recorded_at, now());
		assert_eq!(snapshot.skills, sample_profile().skillvalues);
		Ok(())
	}

	#[test]
	fn latest_snapshot_wins() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		roster::add(&ctx, "Zezima", None)?;

		let mut snapshot = XpSnapshot {
			rsn: "Zezima".to_owned(),
			recorded_at: now(),
			skills: sample_profile().skillvalues,
		};
		save_snapshot(&ctx, &snapshot)?;

		snapshot.recorded_at += TimeDelta::days(1);
		snapshot.skills[0].xp += 1000;
		save_snapshot(&ctx, &snapshot)?;

		assert_eq!(latest_snapshot(&ctx, "Zezima")?, Some(snapshot));
		Ok(())
	}

	#[test]
	fn ranks_players_by_skill_rank() {
		let snapshot = |rsn: &str, xp: u64, rank: Option<u64>| {
			let mut skills = sample_profile().skillvalues;
			skills[0].xp = xp;
			skills[0].rank = rank;
			XpSnapshot {
				rsn: rsn.to_owned(),
				recorded_at: now(),
				skills,
			}
		};

		let snapshots = [
			snapshot("Unranked", 5, None),
			snapshot("Second", 100, Some(20)),
			snapshot("First", 10, Some(3)),
			snapshot("Also unranked", 50, None),
		];

		let attack = Skill::by_alias("attack").unwrap();
		let order: Vec<_> = rank_standings(&snapshots, attack)
			.into_iter()
			.map(|standing| standing.rsn)
			.collect();
		assert_eq!(order, vec!["First", "Second", "Also unranked", "Unranked"]);

		let slayer = Skill::by_alias("slayer").unwrap();
		assert!(rank_standings(&snapshots, slayer).is_empty());
	}

	#[test]
	fn describes_skills() {
		let snapshot = XpSnapshot {
			rsn: "Zezima".to_owned(),
			recorded_at: now(),
			skills: sample_profile().skillvalues,
		};

		let attack = Skill::by_alias("att").unwrap();
		let slayer = Skill::by_alias("slayer").unwrap();
		assert_eq!(
			snapshot.describe(attack),
			"Zezima has 99 Attack with 13456789.0 XP."
		);
		assert_eq!(
			snapshot.describe(slayer),
			"No Slayer data recorded for Zezima."
		);
	}
}
// }}}
