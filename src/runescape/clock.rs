//! Recurring in-game schedules.

use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta};

// {{{ Build tick
/// Hour (UTC) of the weekly citadel build tick, which happens on wednesdays.
pub const BUILD_TICK_HOUR: i64 = 16;

/// Returns the most recent build tick at or before `now`.
///
/// Caps only count towards the current week if they happened after it.
pub fn last_build_tick(now: NaiveDateTime) -> NaiveDateTime {
	let days_since_wednesday = (now.weekday().num_days_from_monday() as i64 + 7 - 2) % 7;
	let tick = now.date().and_time(NaiveTime::MIN) - TimeDelta::days(days_since_wednesday)
		+ TimeDelta::hours(BUILD_TICK_HOUR);

	if tick > now {
		tick - TimeDelta::weeks(1)
	} else {
		tick
	}
}
// }}}
// {{{ Daily reset
/// Time left until the next daily reset, which happens at midnight UTC.
pub fn time_until_reset(now: NaiveDateTime) -> TimeDelta {
	let midnight = now.date().and_time(NaiveTime::MIN) + TimeDelta::days(1);
	midnight - now
}

pub fn format_reset(now: NaiveDateTime) -> String {
	let left = time_until_reset(now).num_seconds();
	format!(
		"Reset is in {} hours, {} minutes, and {} seconds.",
		left / 3600,
		(left / 60) % 60,
		left % 60
	)
}
// }}}
// {{{ Araxxor
pub const ARAXXOR_PATHS: [&str; 3] = ["Path 1 - Minions", "Path 2 - Acid", "Path 3 - Darkness"];
const ARAXXOR_PATH_NAMES: [&str; 3] = ["Top Path (Minions)", "Middle Path (Acid)", "Bottom Path (Darkness)"];
const ARAXXOR_ROTATION_DAYS: i64 = 4;

/// Araxxor closes one of its three paths, rotating every four days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AraxxorRotation {
	/// Index into [ARAXXOR_PATHS] of the currently closed path.
	pub closed: usize,
	pub days_until_next: i64,
}

impl AraxxorRotation {
	pub fn at(now: NaiveDateTime) -> Self {
		let days = now.and_utc().timestamp().div_euclid(86400);
		let cycle = (days + 3).rem_euclid(ARAXXOR_ROTATION_DAYS * ARAXXOR_PATHS.len() as i64);

		Self {
			closed: (cycle / ARAXXOR_ROTATION_DAYS) as usize,
			days_until_next: ARAXXOR_ROTATION_DAYS - cycle % ARAXXOR_ROTATION_DAYS,
		}
	}

	#[inline]
	pub fn next_closed(&self) -> usize {
		(self.closed + 1) % ARAXXOR_PATHS.len()
	}

	pub fn describe(&self) -> String {
		let mut out = String::from("Araxxor/Araxxi rotation:\n");
		for (i, name) in ARAXXOR_PATH_NAMES.iter().enumerate() {
			let state = if i == self.closed { "CLOSED" } else { "OPEN" };
			out.push_str(&format!("{name}: {state}\n"));
		}

		out.push_str(&format!(
			"Next path to be closed will be {} in {} day{}.",
			ARAXXOR_PATHS[self.next_closed()],
			self.days_until_next,
			if self.days_until_next > 1 { "s" } else { "" }
		));
		out
	}
}
// }}}
