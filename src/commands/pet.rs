// {{{ Imports
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::commands::discord::MessageContext;
use crate::commands::utils::help_table::HelpTable;
use crate::context::{Error, PoiseContext, TaggedError};
use crate::runescape::drops::{BossDrops, DropTable};
use crate::runescape::pet::{parse_killcount, DropOdds};
use crate::user_error;
use crate::utils::code_block;
// }}}

// {{{ Argument grammar
#[derive(Debug, Clone, PartialEq, Eq)]
enum PetQuery {
	Help,
	Info {
		boss: String,
	},
	Chance {
		boss: String,
		killcount: i64,
		hardmode: bool,
	},
	Manual {
		denominator: i64,
		threshold: i64,
		killcount: i64,
	},
}

static MANUAL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(-?\d+) (-?\d+) (-?\d+)$").expect("valid regex"));
static HARDMODE_PREFIX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^hm (.+?) (-?\d+)$").expect("valid regex"));
static HARDMODE_SUFFIX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(.+?) (-?\d+) hm$").expect("valid regex"));
static CHANCE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(.+?) (-?\d+)$").expect("valid regex"));

fn number(captures: &Captures, i: usize) -> Result<i64, TaggedError> {
	captures[i]
		.parse()
		.map_err(|_| user_error!("Number too large: {}", &captures[i]))
}

impl PetQuery {
	fn parse(args: &str) -> Result<Self, TaggedError> {
		let args = args.split_whitespace().collect::<Vec<_>>().join(" ");
		let args = args.to_lowercase();

		if args.is_empty() {
			return Err(user_error!("Try `$pet help`."));
		} else if args == "help" {
			return Ok(Self::Help);
		}

		if let Some(captures) = MANUAL.captures(&args) {
			return Ok(Self::Manual {
				denominator: number(&captures, 1)?,
				threshold: number(&captures, 2)?,
				killcount: number(&captures, 3)?,
			});
		}

		let chance = [
			(&*HARDMODE_PREFIX, true),
			(&*HARDMODE_SUFFIX, true),
			(&*CHANCE, false),
		]
		.into_iter()
		.find_map(|(regex, hardmode)| Some((regex.captures(&args)?, hardmode)));

		if let Some((captures, hardmode)) = chance {
			return Ok(Self::Chance {
				boss: captures[1].to_owned(),
				killcount: number(&captures, 2)?,
				hardmode,
			});
		}

		Ok(Self::Info { boss: args })
	}
}
// }}}
// {{{ Replies
fn find_boss<'a>(table: &'a DropTable, boss: &str) -> Result<&'a BossDrops, TaggedError> {
	table
		.lookup(boss)
		.ok_or_else(|| user_error!("The requested boss isn't listed. Try `$bosslist`."))
}

fn droprate_reply(table: &DropTable, boss: &str) -> Result<String, TaggedError> {
	let drops = find_boss(table, boss)?;
	let Some(pet) = drops.pet else {
		return Ok(format!("No pet information listed for {boss}."));
	};

	if boss == "telos" {
		if let Some(hm) = drops.pet_hm {
			return Ok(format!(
				"With <100% enrage, Tess has droprate 1/{} and threshold {}. With >100% enrage, Tess has droprate 1/{} and threshold {}.",
				pet.rate, pet.threshold, hm.rate, hm.threshold
			));
		}
	}

	let mut out = format!(
		"The pet from {boss} has droprate 1/{} and threshold {}.",
		pet.rate, pet.threshold
	);

	if let Some(hm) = drops.pet_hm {
		out.push_str(&format!(
			"\nThe pet from hardmode {boss} has droprate 1/{} and threshold {}.",
			hm.rate, hm.threshold
		));
	}

	Ok(out)
}

fn chance_reply(
	table: &DropTable,
	boss: &str,
	killcount: i64,
	hardmode: bool,
) -> Result<String, TaggedError> {
	let drops = find_boss(table, boss)?;
	let killcount = parse_killcount(killcount)?;
	let Some(pet) = drops.pet else {
		return Ok(format!("No pet information listed for {boss}."));
	};

	// Streaks are only worth it above 100% enrage, so that's the only rate we care about
	if boss == "telos" {
		let odds = DropOdds::from(drops.pet_hm.unwrap_or(pet));
		return Ok(format!(
			"Your chance of not getting Tess by now is: {}%",
			odds.format_not_obtained(killcount)
		));
	}

	match (hardmode, drops.pet_hm) {
		(true, Some(hm)) => Ok(format!(
			"Your chance of not getting the pet by now in hardmode is: {}%",
			DropOdds::from(hm).format_not_obtained(killcount)
		)),
		(true, None) => Ok(format!(
			"No difference in pet chance, using normal mode.\nYour chance of not getting the pet by now is: {}%",
			DropOdds::from(pet).format_not_obtained(killcount)
		)),
		(false, _) => Ok(format!(
			"Your chance of not getting the pet by now is: {}%",
			DropOdds::from(pet).format_not_obtained(killcount)
		)),
	}
}

fn manual_reply(denominator: i64, threshold: i64, killcount: i64) -> Result<String, TaggedError> {
	let odds = DropOdds::new(denominator, threshold)?;
	let killcount = parse_killcount(killcount)?;

	Ok(format!(
		"Your chance of not getting the pet by now is: {}%",
		odds.format_not_obtained(killcount)
	))
}

pub fn pet_help() -> String {
	HelpTable::new("Pet Cog")
		.row("$pet <boss>", "Displays pet droprate for the given boss.")
		.row(
			"$pet <boss> <kc>",
			"Displays chance of not getting pet by given killcount.",
		)
		.row("$pet hm <boss> <kc>", "Like above, but hardmode.")
		.row(
			"$pet <droprate> <thresh> <kc>",
			"Manual pet function, input values to get chance of not getting pet.",
		)
		.row("$pet help", "Returns this message.")
		.render()
}
// }}}
// {{{ Pet
// {{{ Implementation
pub async fn pet_impl(ctx: &mut impl MessageContext, args: &str) -> Result<(), TaggedError> {
	let table = ctx.data().drop_table;
	let out = match PetQuery::parse(args)? {
		PetQuery::Help => pet_help(),
		PetQuery::Info { boss } => code_block(&droprate_reply(table, &boss)?),
		PetQuery::Chance {
			boss,
			killcount,
			hardmode,
		} => code_block(&chance_reply(table, &boss, killcount, hardmode)?),
		PetQuery::Manual {
			denominator,
			threshold,
			killcount,
		} => code_block(&manual_reply(denominator, threshold, killcount)?),
	};

	ctx.reply(&out).await?;
	Ok(())
}
// }}}
// {{{ Discord wrapper
/// Pet drop chances. Try `$pet help`.
#[poise::command(prefix_command, user_cooldown = 1)]
pub async fn pet(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Boss and killcount, or droprate, threshold and killcount"]
	args: String,
) -> Result<(), Error> {
	let res = pet_impl(&mut ctx, &args).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// }}}
// {{{ Boss list
pub async fn bosslist_impl(ctx: &mut impl MessageContext) -> Result<(), TaggedError> {
	let bosses = ctx.data().drop_table.bosses().collect::<Vec<_>>().join(", ");
	ctx.reply(&code_block(&format!("The tracked bosses are: {bosses}")))
		.await?;
	Ok(())
}

/// Lists the bosses with known drop rates.
#[poise::command(prefix_command)]
pub async fn bosslist(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = bosslist_impl(&mut ctx).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Drop list
pub async fn droplist_impl(ctx: &mut impl MessageContext, boss: &str) -> Result<(), TaggedError> {
	let boss = boss.trim().to_lowercase();
	let drops = ctx
		.data()
		.drop_table
		.drops(&boss)
		.ok_or_else(|| user_error!("The requested boss isn't listed. Try `$bosslist`."))?;
	let out = format!("The drops for {boss} are: {}", drops.join(", "));
	ctx.reply(&code_block(&out)).await?;
	Ok(())
}

/// Lists every drop of a boss.
#[poise::command(prefix_command)]
pub async fn droplist(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Boss name"]
	boss: String,
) -> Result<(), Error> {
	let res = droplist_impl(&mut ctx, &boss).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Drop
pub async fn drop_impl(
	ctx: &mut impl MessageContext,
	boss: &str,
	item: &str,
) -> Result<(), TaggedError> {
	let boss = boss.trim().to_lowercase();
	let item = item.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();

	let out = match ctx.data().drop_table.drop_rate(&boss, &item) {
		Some(rate) => format!("The droprate for {boss} of {item} is: 1/{rate}"),
		None => "Specified drop or boss not listed.".to_owned(),
	};

	ctx.reply(&code_block(&out)).await?;
	Ok(())
}

/// Drop rate of a single item. Multi-word boss names must be quoted.
#[poise::command(prefix_command)]
pub async fn drop(
	mut ctx: PoiseContext<'_>,
	#[description = "Boss"] boss: String,
	#[rest]
	#[description = "Item name"]
	item: String,
) -> Result<(), Error> {
	let res = drop_impl(&mut ctx, &boss, &item).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
