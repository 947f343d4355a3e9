// {{{ Imports
use std::sync::LazyLock;

use regex::Regex;

use crate::commands::discord::MessageContext;
use crate::commands::utils::help_table::HelpTable;
use crate::context::{Error, PoiseContext, TaggedError};
use crate::runescape::pet::{parse_killcount, DropOdds};
use crate::runescape::telos::{expected_uniques, kills_until_unique, unique_denominator, Enrage};
use crate::user_error;
use crate::utils::{code_block, format_significant};
// }}}

/// Tess uses the hard mode rates, since nobody streaks below 100% enrage.
const TESS_DROPRATE: i64 = 700;
const TESS_THRESHOLD: i64 = 300;

// {{{ Argument grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TelosQuery {
	Help,
	Bounds { start: u32, end: u32 },
	Start { enrage: u32 },
	Kill { enrage: u32, streak: u32 },
	Pet { killcount: i64 },
}

static BOUNDS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(\d{1,4})% (\d+)%$").expect("valid regex"));
static START: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(\d{1,4})%$").expect("valid regex"));
static KILL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(\d{1,4})% (\d+)kc$").expect("valid regex"));
static PET: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^pet (-?\d+)$").expect("valid regex"));

fn usage() -> TaggedError {
	user_error!("Invalid arguments. Try `$telos help`.")
}

impl TelosQuery {
	fn parse(args: &str) -> Result<Self, TaggedError> {
		let args = args.split_whitespace().collect::<Vec<_>>().join(" ");
		let args = args.to_lowercase();
		let num = |s: &str| s.parse().map_err(|_| usage());

		if args == "help" {
			Ok(Self::Help)
		} else if let Some(c) = BOUNDS.captures(&args) {
			Ok(Self::Bounds {
				start: num(&c[1])?,
				end: num(&c[2])?,
			})
		} else if let Some(c) = START.captures(&args) {
			Ok(Self::Start { enrage: num(&c[1])? })
		} else if let Some(c) = KILL.captures(&args) {
			Ok(Self::Kill {
				enrage: num(&c[1])?,
				streak: num(&c[2])?,
			})
		} else if let Some(c) = PET.captures(&args) {
			Ok(Self::Pet {
				killcount: c[1].parse().map_err(|_| usage())?,
			})
		} else {
			Err(usage())
		}
	}
}
// }}}
// {{{ Replies
fn bounds_reply(start: u32, end: u32) -> Result<String, TaggedError> {
	let expectation = expected_uniques(start, end)?;
	let (start, end) = (Enrage::new(start), Enrage::new(end));
	Ok(format!(
		"{}Streaking from {}% to {}%:\nExpected number of kills: {}\nExpected uniques: {} without LotD, {} with LotD.",
		end.notice(),
		start.value,
		end.value,
		expectation.kills,
		format_significant(expectation.uniques, 4),
		format_significant(expectation.uniques_with_lotd, 4)
	))
}

fn start_reply(enrage: u32) -> String {
	let enrage = Enrage::new(enrage);
	format!(
		"{}Streaking from {}%:\nExpected kills until unique: {} without LotD, {} with LotD.",
		enrage.notice(),
		enrage.value,
		kills_until_unique(enrage.value, false),
		kills_until_unique(enrage.value, true)
	)
}

fn kill_reply(enrage: u32, streak: u32) -> String {
	let enrage = Enrage::new(enrage);
	let value = enrage.value as f64;
	format!(
		"{}A kill with enrage {}% and streak {streak}:\nUnique chance: 1/{} without LotD, 1/{} with LotD.",
		enrage.notice(),
		enrage.value,
		unique_denominator(value, streak, false),
		unique_denominator(value, streak, true)
	)
}

fn pet_reply(killcount: i64) -> Result<String, TaggedError> {
	let odds = DropOdds::new(TESS_DROPRATE, TESS_THRESHOLD)?;
	let killcount = parse_killcount(killcount)?;
	Ok(format!(
		"Your chance of not getting Tess by now is: {}%",
		odds.format_not_obtained(killcount)
	))
}

pub fn telos_help() -> String {
	HelpTable::new("Telos Cog")
		.row(
			"$telos <enrage>% <enrage>%",
			"Expected uniques when streaking from first to second enrage.",
		)
		.row(
			"$telos <enrage>%",
			"Expected number of kills until a unique starting at the given enrage.",
		)
		.row(
			"$telos <enrage>% <streak>kc",
			"Chance of obtaining a unique with a kill at the given enrage and streak.",
		)
		.row(
			"$telos pet <kc>",
			"Chance of not getting Tess by the time you hit the given killcount.",
		)
		.row("$telos help", "Returns this message.")
		.render()
}
// }}}
// {{{ Implementation
pub async fn telos_impl(ctx: &mut impl MessageContext, args: &str) -> Result<(), TaggedError> {
	let out = match TelosQuery::parse(args)? {
		TelosQuery::Help => telos_help(),
		TelosQuery::Bounds { start, end } => code_block(&bounds_reply(start, end)?),
		TelosQuery::Start { enrage } => code_block(&start_reply(enrage)),
		TelosQuery::Kill { enrage, streak } => code_block(&kill_reply(enrage, streak)),
		TelosQuery::Pet { killcount } => code_block(&pet_reply(killcount)?),
	};

	ctx.reply(&out).await?;
	Ok(())
}
// }}}
// {{{ Discord wrapper
/// Telos enrage and streak calculations. Try `$telos help`.
#[poise::command(prefix_command, user_cooldown = 1)]
pub async fn telos(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Enrage bounds, start enrage, or enrage and streak"]
	args: String,
) -> Result<(), Error> {
	let res = telos_impl(&mut ctx, &args).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
