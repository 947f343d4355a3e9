//! Citadel cap tracking.
//!
//! Members cap at the clan citadel at most once per week. Caps are detected
//! by scanning adventurer's logs, and each cap is only reported once.

// {{{ Imports
use std::fmt::Display;

use chrono::NaiveDateTime;
use rusqlite::{OptionalExtension, Row};
use tracing::{debug, info, warn};

use crate::context::{Error, UserContext};
use crate::runescape::alog::{find_activity, AlogSource};
use crate::runescape::clock::last_build_tick;
use crate::runescape::roster;
// }}}

/// Text the game uses for cap activities.
pub const CAP_ACTIVITY: &str = "capped";

// {{{ Cap records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapRecord {
	pub rsn: String,
	pub capped_at: NaiveDateTime,
}

impl CapRecord {
	#[inline]
	fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
		Ok(Self {
			rsn: row.get("rsn")?,
			capped_at: row.get("last_cap_time")?,
		})
	}
}

impl Display for CapRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} has capped at the citadel on {} at {}.",
			self.rsn,
			self.capped_at.format("%d-%b-%Y"),
			self.capped_at.format("%H:%M")
		)
	}
}
// }}}
// {{{ Storage
/// Records the latest cap of a player.
///
/// Returns `false` if this cap (or a later one) was already recorded.
pub fn record_cap(ctx: &UserContext, rsn: &str, capped_at: NaiveDateTime) -> Result<bool, Error> {
	if let Some(previous) = last_cap(ctx, rsn)? {
		if previous.capped_at >= capped_at {
			return Ok(false);
		}
	}

	ctx.db
		.get()?
		.prepare_cached(
			"
        INSERT INTO caps(rsn, last_cap_time) VALUES (?, ?)
        ON CONFLICT(rsn) DO UPDATE SET last_cap_time=excluded.last_cap_time
      ",
		)?
		.execute((rsn, capped_at))?;

	Ok(true)
}

/// The last recorded cap of a player, under the name the roster knows them by.
pub fn last_cap(ctx: &UserContext, rsn: &str) -> Result<Option<CapRecord>, Error> {
	let record = ctx
		.db
		.get()?
		.prepare_cached("SELECT rsn, last_cap_time FROM caps WHERE rsn = ?")?
		.query_row([rsn], CapRecord::from_row)
		.optional()?;

	Ok(record)
}

/// Every recorded cap, oldest first.
pub fn caps(ctx: &UserContext) -> Result<Vec<CapRecord>, Error> {
	let caps = ctx
		.db
		.get()?
		.prepare_cached("SELECT rsn, last_cap_time FROM caps ORDER BY last_cap_time, rsn")?
		.query_map((), CapRecord::from_row)?
		.collect::<Result<_, _>>()?;

	Ok(caps)
}

/// Caps which happened after `since`, oldest first.
pub fn caps_since(ctx: &UserContext, since: NaiveDateTime) -> Result<Vec<CapRecord>, Error> {
	let caps = ctx
		.db
		.get()?
		.prepare_cached(
			"
        SELECT rsn, last_cap_time FROM caps
        WHERE last_cap_time > ?
        ORDER BY last_cap_time, rsn
      ",
		)?
		.query_map([since], CapRecord::from_row)?
		.collect::<Result<_, _>>()?;

	Ok(caps)
}
// }}}
// {{{ Sweep
/// Somewhere cap reports get posted to, usually the cap channel.
pub trait CapSink {
	async fn post(&self, text: &str) -> Result<(), Error>;
}

/// Checks the log of every roster member, returning the caps which haven't
/// been reported yet. Nothing gets recorded.
///
/// Caps from before the latest build tick belong to a previous week and are
/// ignored. Members whose profile can't be fetched are skipped.
pub async fn check_caps(
	ctx: &UserContext,
	source: &impl AlogSource,
	now: NaiveDateTime,
) -> Result<Vec<CapRecord>, Error> {
	let tick = last_build_tick(now);
	let mut pending = Vec::new();

	debug!("Last build tick: {tick}");

	for rsn in roster::list(ctx)? {
		let profile = match source.fetch_profile(&rsn).await {
			Ok(Some(profile)) => profile,
			Ok(None) => {
				debug!("{rsn}'s profile is private.");
				continue;
			}
			Err(err) => {
				warn!("Skipping {rsn}: {err:#}");
				continue;
			}
		};

		let capped_at = match find_activity(&profile, CAP_ACTIVITY) {
			Ok(Some(date)) => date,
			Ok(None) => continue,
			Err(err) => {
				warn!("Skipping {rsn}: {err:#}");
				continue;
			}
		};

		if capped_at <= tick {
			debug!("Not reporting cap for {rsn}: not after the build tick.");
		} else if last_cap(ctx, &rsn)?.is_some_and(|previous| previous.capped_at >= capped_at) {
			debug!("Not reporting cap for {rsn}: already reported.");
		} else {
			pending.push(CapRecord { rsn, capped_at });
		}
	}

	Ok(pending)
}

/// Posts every unreported cap to `sink`.
///
/// A cap is only recorded once its post went through, so failed posts get
/// retried by the next sweep.
pub async fn report_caps(
	ctx: &UserContext,
	source: &impl AlogSource,
	sink: &impl CapSink,
	now: NaiveDateTime,
) -> Result<Vec<CapRecord>, Error> {
	let mut reported = Vec::new();

	for record in check_caps(ctx, source, now).await? {
		if let Err(err) = sink.post(&record.to_string()).await {
			warn!("Could not report {}'s cap: {err:#}", record.rsn);
			continue;
		}

		record_cap(ctx, &record.rsn, record.capped_at)?;
		reported.push(record);
	}

	info!("Cap sweep reported {} new caps", reported.len());
	Ok(reported)
}
// }}}
