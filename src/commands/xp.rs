// {{{ Imports
use std::sync::LazyLock;

use chrono::{NaiveDateTime, Utc};
use regex::Regex;

use crate::commands::discord::MessageContext;
use crate::commands::utils::help_table::HelpTable;
use crate::context::{Error, PoiseContext, TaggedError};
use crate::runescape::alog::AlogSource;
use crate::runescape::roster::normalize_rsn;
use crate::runescape::skills::{format_xp, Skill, SKILLS};
use crate::runescape::xp::{latest_snapshot, rank_standings, snapshot_xp};
use crate::user::OwnedAccount;
use crate::user_error;
use crate::utils::code_block;
// }}}

// {{{ Skill
pub async fn skill_impl(ctx: &mut impl MessageContext, args: &str) -> Result<(), TaggedError> {
	let args = normalize_rsn(args);
	let Some((rsn, skill)) = args.rsplit_once(' ') else {
		return Err(user_error!("Usage: `$skill <rsn> <skill>`."));
	};

	let rsn = rsn.trim();
	let skill = Skill::by_alias(skill)
		.ok_or_else(|| user_error!("Unknown skill {skill}. Try `$skilllist`."))?;
	let snapshot = latest_snapshot(ctx.data(), rsn)?
		.ok_or_else(|| user_error!("Player {rsn} not found in database."))?;

	ctx.reply(&snapshot.describe(skill)).await?;
	Ok(())
}

/// Shows the level and xp of a player in some skill, as of the last daily snapshot.
#[poise::command(prefix_command)]
pub async fn skill(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Player name followed by a skill"]
	args: String,
) -> Result<(), Error> {
	let res = skill_impl(&mut ctx, &args).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Skill list
pub fn skill_list() -> String {
	SKILLS
		.iter()
		.fold(HelpTable::new("List of skills and their aliases:"), |table, skill| {
			table.row(&skill.title(), &skill.aliases.join(", "))
		})
		.render()
}

/// Lists every skill together with its aliases.
#[poise::command(prefix_command)]
pub async fn skilllist(ctx: PoiseContext<'_>) -> Result<(), Error> {
	ctx.say(skill_list()).await?;
	Ok(())
}
// }}}
// {{{ Xp
static MENTION: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^<@!?(\d+)>$").expect("valid regex"));

fn main_account(ctx: &impl MessageContext, discord_id: &str) -> Result<Option<String>, Error> {
	let main = OwnedAccount::by_discord_id(ctx.data(), discord_id)?
		.into_iter()
		.find(|account| account.is_main)
		.map(|account| account.rsn);
	Ok(main)
}

/// Compares several players in a skill, ranked by their skill rank.
///
/// Players are separated by commas, and can be either names or discord
/// mentions of registered users. Without any players, the main account of
/// the author is used.
pub async fn xp_impl(ctx: &mut impl MessageContext, args: &str) -> Result<(), TaggedError> {
	let args = args.trim();
	let (skill, players) = args.split_once(' ').unwrap_or((args, ""));
	if skill.is_empty() {
		return Err(user_error!("Usage: `$xp <skill> [players, separated by commas]`."));
	}

	let skill = Skill::by_alias(skill)
		.ok_or_else(|| user_error!("Unknown skill {skill}. Try `$skilllist`."))?;

	let mut names = Vec::new();
	if players.trim().is_empty() {
		let author = ctx.author_id().to_string();
		let main = main_account(&*ctx, &author)?.ok_or_else(|| {
			user_error!("You don't have a main account registered. Try `$register main <rsn>`.")
		})?;
		names.push(main);
	} else {
		for player in players.split(',').map(normalize_rsn) {
			if player.is_empty() {
				continue;
			}

			match MENTION.captures(&player) {
				Some(c) => match main_account(&*ctx, &c[1])? {
					Some(main) => names.push(main),
					None => ctx.reply(&format!("Player {player} not found in database.")).await?,
				},
				None => names.push(player),
			}
		}
	}

	let mut snapshots = Vec::with_capacity(names.len());
	for name in names {
		match latest_snapshot(ctx.data(), &name)? {
			Some(snapshot) => snapshots.push(snapshot),
			None => ctx.reply(&format!("Player {name} not found in database.")).await?,
		}
	}

	let standings = rank_standings(&snapshots, skill);
	if standings.is_empty() {
		return Ok(());
	}

	let mut out = format!("{}:\n", skill.title());
	for (i, standing) in standings.iter().enumerate() {
		out.push_str(&format!(
			"{}. {} has level {} {}, with {} xp.\n",
			i + 1,
			standing.rsn,
			standing.level,
			skill.name,
			format_xp(standing.xp)
		));
	}

	ctx.reply(&code_block(out.trim_end())).await?;
	Ok(())
}

/// Compares players in a skill. Separate players with commas; defaults to your main.
#[poise::command(prefix_command, subcommands("xp_check", "xp_list"))]
pub async fn xp(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Skill followed by players"]
	args: String,
) -> Result<(), Error> {
	let res = xp_impl(&mut ctx, &args).await;
	ctx.handle_error(res).await?;
	Ok(())
}

pub async fn xp_check_impl(
	ctx: &mut impl MessageContext,
	source: &impl AlogSource,
	now: NaiveDateTime,
) -> Result<(), TaggedError> {
	let saved = snapshot_xp(ctx.data(), source, now).await?;
	ctx.reply(&format!("Saved {saved} xp snapshots.")).await?;
	Ok(())
}

/// Records a fresh xp snapshot of every roster member.
#[poise::command(prefix_command, owners_only, rename = "check")]
async fn xp_check(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let alog = ctx.data().alog.clone();
	let res = xp_check_impl(&mut ctx, &alog, Utc::now().naive_utc()).await;
	ctx.handle_error(res).await?;
	Ok(())
}

/// Lists every skill together with its aliases.
#[poise::command(prefix_command, rename = "list")]
async fn xp_list(ctx: PoiseContext<'_>) -> Result<(), Error> {
	ctx.say(skill_list()).await?;
	Ok(())
}
// }}}
