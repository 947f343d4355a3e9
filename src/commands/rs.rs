// {{{ Imports
use chrono::{NaiveDateTime, Utc};
use rand::Rng;

use crate::commands::discord::MessageContext;
use crate::context::{Error, PoiseContext, TaggedError};
use crate::runescape::alog::{format_alog, AlogSource};
use crate::runescape::clock::{format_reset, AraxxorRotation};
use crate::runescape::roster::normalize_rsn;
use crate::user_error;
use crate::utils::code_block;
// }}}

// {{{ Adventurer's log
pub async fn alog_impl(
	ctx: &mut impl MessageContext,
	source: &impl AlogSource,
	rsn: &str,
) -> Result<(), TaggedError> {
	let rsn = normalize_rsn(rsn);
	if rsn.is_empty() {
		return Err(user_error!("Usage: `$alog <rsn>`."));
	}

	let profile = source.fetch_profile(&rsn).await?;
	ctx.reply(&code_block(&format_alog(&rsn, profile.as_ref())))
		.await?;
	Ok(())
}

/// Shows the most recent adventurer's log entries of a player.
#[poise::command(prefix_command, user_cooldown = 5)]
pub async fn alog(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Player name"]
	rsn: String,
) -> Result<(), Error> {
	let source = ctx.data().alog.clone();
	let res = alog_impl(&mut ctx, &source, &rsn).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Reset
pub async fn reset_impl(ctx: &mut impl MessageContext, now: NaiveDateTime) -> Result<(), TaggedError> {
	ctx.reply(&format_reset(now)).await?;
	Ok(())
}

/// Time left until the daily reset.
#[poise::command(prefix_command)]
pub async fn reset(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = reset_impl(&mut ctx, Utc::now().naive_utc()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Araxxor
pub async fn araxxor_impl(ctx: &mut impl MessageContext, now: NaiveDateTime) -> Result<(), TaggedError> {
	ctx.reply(&code_block(&AraxxorRotation::at(now).describe()))
		.await?;
	Ok(())
}

/// Which Araxxor path is currently closed.
#[poise::command(prefix_command, aliases("rax", "araxxi"))]
pub async fn araxxor(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = araxxor_impl(&mut ctx, Utc::now().naive_utc()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Roll
/// Rolls a number between `min` (1 unless given) and `max`, both inclusive.
pub fn roll_number(rng: &mut impl Rng, args: &str) -> Result<i64, TaggedError> {
	let parse = |s: &str| {
		s.parse::<i64>()
			.map_err(|_| user_error!("One or both arguments are not valid numbers."))
	};

	let (min, max) = match args.split_whitespace().collect::<Vec<_>>()[..] {
		[max] => (1, parse(max)?),
		[min, max] => (parse(min)?, parse(max)?),
		_ => {
			return Err(user_error!(
				"Invalid arguments. Syntax is `$roll <max>` or `$roll <min> <max>`."
			))
		}
	};

	if min >= max {
		return Err(user_error!("Min greater than or equal to max ({min} >= {max})."));
	}

	Ok(rng.gen_range(min..=max))
}

pub async fn roll_impl(ctx: &mut impl MessageContext, args: &str) -> Result<(), TaggedError> {
	let rolled = roll_number(&mut rand::thread_rng(), args)?;
	ctx.reply(&format!("Rolled {rolled}!")).await?;
	Ok(())
}

/// Rolls a random number.
#[poise::command(prefix_command)]
pub async fn roll(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Optional minimum, then the maximum"]
	args: String,
) -> Result<(), Error> {
	let res = roll_impl(&mut ctx, &args).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod tests {
	use super::*;
	use crate::commands::discord::mock::MockContext;
	use crate::context::testing::get_mock_context;
	use crate::golden_test;
	use crate::runescape::alog::tests::{sample_profile, FakeAlog};
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn now() -> NaiveDateTime {
		NaiveDateTime::parse_from_str("2026-10-17 22:30:15", "%Y-%m-%d %H:%M:%S").unwrap()
	}

	golden_test!(game_clock, "commands/rs/game_clock");
	async fn game_clock(ctx: &mut MockContext) -> Result<(), TaggedError> {
		reset_impl(ctx, now()).await?;
		araxxor_impl(ctx, now()).await?;
		Ok(())
	}

	golden_test!(logs, "commands/rs/logs");
	async fn logs(ctx: &mut MockContext) -> Result<(), TaggedError> {
		let source = FakeAlog::default()
			.with("Zezima", Some(sample_profile()))
			.with("Hidden", None);

		alog_impl(ctx, &source, "Zezima").await?;
		alog_impl(ctx, &source, "Hidden").await?;
		Ok(())
	}

	#[test]
	fn rolls_stay_within_bounds() -> Result<(), Error> {
		let mut rng = StdRng::seed_from_u64(7);
		let mut seen = [false; 2];
		for _ in 0..200 {
			let rolled = roll_number(&mut rng, "1 2").map_err(|e| e.error)?;
			seen[(rolled - 1) as usize] = true;

			let rolled = roll_number(&mut rng, "6").map_err(|e| e.error)?;
			assert!((1..=6).contains(&rolled));

			let rolled = roll_number(&mut rng, "-10 -5").map_err(|e| e.error)?;
			assert!((-10..=-5).contains(&rolled));
		}

		assert_eq!(seen, [true, true]);
		Ok(())
	}

	#[tokio::test]
	async fn bad_rolls() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		for args in ["", "1 2 3", "one", "5 5", "1"] {
			let res = roll_impl(&mut ctx, args).await;
			ctx.handle_error(res).await?;
		}

		assert_eq!(
			ctx.messages,
			vec![
				"Invalid arguments. Syntax is `$roll <max>` or `$roll <min> <max>`.",
				"Invalid arguments. Syntax is `$roll <max>` or `$roll <min> <max>`.",
				"One or both arguments are not valid numbers.",
				"Min greater than or equal to max (5 >= 5).",
				"Min greater than or equal to max (1 >= 1).",
			]
		);
		Ok(())
	}

	#[tokio::test]
	async fn network_failures_are_internal() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		let res = alog_impl(&mut ctx, &FakeAlog::default(), "Offline").await;
		assert!(ctx.handle_error(res).await.is_err());
		assert!(ctx.messages.is_empty());
		Ok(())
	}
}
// }}}
