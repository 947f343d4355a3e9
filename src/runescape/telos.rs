//! Unique drop rates at Telos, which depend on the enrage and kill streak.

use crate::context::TaggedError;
use crate::user_error;

/// Average enrage gained per kill while streaking.
pub const STREAK_INCREASE: f64 = 11.58;

/// Enrage values above this no longer improve the drop rate.
pub const MAX_ENRAGE: u32 = 4000;

/// The denominator can never go below this.
pub const MIN_DENOMINATOR: u32 = 9;

/// Drop rate denominator of a unique for a single kill.
///
/// Luck of the Dwarves counts as an extra 25% enrage.
pub fn unique_denominator(enrage: f64, streak: u32, lotd: bool) -> u32 {
	let lotd = if lotd { 1.0 } else { 0.0 };
	let raw = (10000.0 / (10.0 + 0.25 * (enrage + 25.0 * lotd) + 3.0 * streak as f64)).floor();
	(raw as u32).max(MIN_DENOMINATOR)
}

/// Probability of a unique for a single kill.
#[inline]
pub fn unique_chance(enrage: f64, streak: u32, lotd: bool) -> f64 {
	1.0 / unique_denominator(enrage, streak, lotd) as f64
}

// {{{ Enrage clamping
/// An enrage value, clamped to the range where it still matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrage {
	pub value: u32,
	pub clamped: bool,
}

impl Enrage {
	pub fn new(value: u32) -> Self {
		if value > MAX_ENRAGE {
			Self {
				value: MAX_ENRAGE,
				clamped: true,
			}
		} else {
			Self {
				value,
				clamped: false,
			}
		}
	}

	#[inline]
	pub fn notice(&self) -> &'static str {
		if self.clamped {
			"Using an enrage of 4000 (max chance).\n"
		} else {
			""
		}
	}
}
// }}}
// {{{ Expected uniques
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakExpectation {
	/// Number of kills it takes to go from the start to the end enrage.
	pub kills: u32,
	pub uniques: f64,
	pub uniques_with_lotd: f64,
}

/// Expected amount of uniques when streaking from `start` to `end` enrage.
///
/// Both bounds are clamped to [`MAX_ENRAGE`].
pub fn expected_uniques(start: u32, end: u32) -> Result<StreakExpectation, TaggedError> {
	if start > end {
		return Err(user_error!("Start enrage must be less than end enrage."));
	}

	let (start, end) = (start.min(MAX_ENRAGE), end.min(MAX_ENRAGE));

	let kills = ((end - start) as f64 / STREAK_INCREASE).ceil() as u32;
	let mut uniques = 0.0;
	let mut uniques_with_lotd = 0.0;

	for streak in 1..=kills {
		let enrage = start as f64 + STREAK_INCREASE * streak as f64;
		uniques += unique_chance(enrage, streak, false);
		uniques_with_lotd += unique_chance(enrage, streak, true);
	}

	Ok(StreakExpectation {
		kills,
		uniques,
		uniques_with_lotd,
	})
}
// }}}
// {{{ Kills until unique
/// Expected number of kills before a unique when starting a streak at the given enrage.
///
/// Accumulates the per-kill probability until it adds up to more than a
/// single unique.
pub fn kills_until_unique(start: u32, lotd: bool) -> u32 {
	let mut expected = 0.0;
	let mut streak = 0;

	while expected <= 1.0 {
		let enrage = start as f64 + STREAK_INCREASE * streak as f64;
		expected += unique_chance(enrage, streak, lotd);
		streak += 1;
	}

	streak
}
// }}}
// {{{ Tests
#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_rate() {
		assert_eq!(unique_denominator(0.0, 0, false), 1000);
		assert_eq!(unique_chance(0.0, 0, false), 1.0 / 1000.0);
	}

	#[test]
	fn lotd_counts_as_extra_enrage() {
		// 10000 / 16.25
		assert_eq!(unique_denominator(0.0, 0, true), 615);
		assert_eq!(
			unique_denominator(25.0, 0, false),
			unique_denominator(0.0, 0, true)
		);
	}

	#[test]
	fn known_values() {
		// 10000 / (10 + 25 + 3)
		assert_eq!(unique_denominator(100.0, 1, false), 263);
		// 10000 / (10 + 1000 + 300)
		assert_eq!(unique_denominator(4000.0, 100, false), 9);
	}

	#[test]
	fn capped_at_one_in_nine() {
		assert_eq!(unique_denominator(4000.0, 1000, true), MIN_DENOMINATOR);
		assert_eq!(unique_denominator(1e9, 0, false), MIN_DENOMINATOR);
	}

	#[test]
	fn chance_in_range_and_monotonic() {
		for lotd in [false, true] {
			for streak in (0..500).step_by(13) {
				let mut previous = 0.0;
				for enrage in (0..=4000).step_by(37) {
					let chance = unique_chance(enrage as f64, streak, lotd);
					assert!(chance > 0.0 && chance <= 1.0 / 9.0);
					assert!(chance >= previous, "enrage {enrage} streak {streak}");
					previous = chance;
				}
			}

			for enrage in (0..=4000).step_by(101) {
				let mut previous = 0.0;
				for streak in 0..500 {
					let chance = unique_chance(enrage as f64, streak, lotd);
					assert!(chance >= previous, "enrage {enrage} streak {streak}");
					previous = chance;
				}
			}
		}
	}

	#[test]
	fn empty_enrage_range() -> Result<(), TaggedError> {
		let res = expected_uniques(500, 500)?;
		assert_eq!(res.kills, 0);
		assert_eq!(res.uniques, 0.0);
		assert_eq!(res.uniques_with_lotd, 0.0);
		Ok(())
	}

	#[test]
	fn expected_uniques_sums_each_kill() -> Result<(), TaggedError> {
		let res = expected_uniques(0, 20)?;
		assert_eq!(res.kills, 2);

		let expected = 1.0 / unique_denominator(11.58, 1, false) as f64
			+ 1.0 / unique_denominator(23.16, 2, false) as f64;
		assert!((res.uniques - expected).abs() < 1e-12);
		assert!(res.uniques_with_lotd > res.uniques);
		Ok(())
	}

	#[test]
	fn huge_ranges_stop_at_max_enrage() -> Result<(), TaggedError> {
		let res = expected_uniques(0, 4_000_000_000)?;
		assert_eq!(res.kills, 346);
		assert_eq!(res, expected_uniques(0, MAX_ENRAGE)?);
		assert_eq!(expected_uniques(5000, 6000)?.kills, 0);
		Ok(())
	}

	#[test]
	fn rejects_reversed_ranges() {
		let err = expected_uniques(200, 100).unwrap_err();
		assert_eq!(
			err.error.to_string(),
			"Start enrage must be less than end enrage."
		);
	}

	#[test]
	fn kills_until_unique_from_zero() {
		assert_eq!(kills_until_unique(0, false), 57);
		assert_eq!(kills_until_unique(0, true), 56);
		assert_eq!(kills_until_unique(1000, false), 29);
	}

	#[test]
	fn lotd_never_takes_longer() {
		for start in (0..=4000).step_by(250) {
			let without = kills_until_unique(start, false);
			let with = kills_until_unique(start, true);
			assert!(with <= without, "start {start}: {with} > {without}");
		}
	}

	#[test]
	fn enrage_gets_clamped() {
		assert_eq!(
			Enrage::new(5000),
			Enrage {
				value: 4000,
				clamped: true
			}
		);
		assert_eq!(Enrage::new(4000).notice(), "");
		assert!(!Enrage::new(20).clamped);
	}
}
// }}}
