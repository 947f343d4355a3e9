//! Chance of not having received a rubber-banded drop yet.
//!
//! Pets use a threshold mechanic: the base rate is `1/rate`, and every
//! `threshold` kills without the drop the numerator goes up by one, up to
//! nine times the base rate.

use crate::context::TaggedError;
use crate::runescape::drops::PetRate;
use crate::user_error;
use crate::utils::format_significant;

/// The numerator stops increasing once this segment is reached.
pub const MAX_SEGMENT: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOdds {
	denominator: u32,
	threshold: u32,
}

impl DropOdds {
	/// Validates user supplied odds.
	pub fn new(denominator: i64, threshold: i64) -> Result<Self, TaggedError> {
		let denominator = u32::try_from(denominator)
			.ok()
			.filter(|d| *d >= 1)
			.ok_or_else(|| user_error!("Invalid droprate (use the denominator)."))?;
		let threshold = u32::try_from(threshold).map_err(|_| user_error!("Invalid threshold."))?;

		Ok(Self {
			denominator,
			threshold,
		})
	}

	#[inline]
	pub fn denominator(&self) -> u32 {
		self.denominator
	}

	#[inline]
	pub fn threshold(&self) -> u32 {
		self.threshold
	}

	/// Probability (in `[0, 1]`) of still not having the drop after `killcount` kills.
	pub fn chance_not_obtained(&self, killcount: u32) -> f64 {
		let denominator = self.denominator as f64;
		let mut remaining = killcount;
		let mut segment = 1;
		let mut chance = 1.0;

		loop {
			// Tiny denominators would otherwise produce negative failure odds
			let rate = (segment as f64 / denominator).min(1.0);

			if remaining < self.threshold || segment == MAX_SEGMENT {
				chance *= (1.0 - rate).powf(remaining as f64);
				break;
			}

			chance *= (1.0 - rate).powf(self.threshold as f64);
			remaining -= self.threshold;
			segment += 1;
		}

		chance
	}

	/// Same as [Self::chance_not_obtained], but as a percentage.
	#[inline]
	pub fn percent_not_obtained(&self, killcount: u32) -> f64 {
		self.chance_not_obtained(killcount) * 100.0
	}

	/// Human readable percentage, with 4 significant digits.
	#[inline]
	pub fn format_not_obtained(&self, killcount: u32) -> String {
		format_significant(self.percent_not_obtained(killcount), 4)
	}
}

impl From<PetRate> for DropOdds {
	fn from(rate: PetRate) -> Self {
		Self {
			denominator: rate.rate.max(1),
			threshold: rate.threshold,
		}
	}
}

/// Validates a user supplied kill count.
pub fn parse_killcount(killcount: i64) -> Result<u32, TaggedError> {
	u32::try_from(killcount).map_err(|_| user_error!("Invalid killcount."))
}

// }}}
