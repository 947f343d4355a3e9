// {{{ Imports
use chrono::{NaiveDateTime, Utc};

use crate::commands::discord::MessageContext;
use crate::context::{Error, PoiseContext, TaggedError};
use crate::runescape::roster::{self, normalize_rsn};
use crate::user::{change_name, register as register_account};
use crate::user_error;
// }}}

/// Parses the `main` / `alt` argument into whether the account is a main.
fn parse_kind(kind: &str) -> Result<bool, TaggedError> {
	match kind.trim().to_lowercase().as_str() {
		"main" => Ok(true),
		"alt" => Ok(false),
		_ => Err(user_error!("Account type must be either `main` or `alt`.")),
	}
}

#[inline]
fn kind_name(is_main: bool) -> &'static str {
	if is_main {
		"main"
	} else {
		"alt"
	}
}

// {{{ Register
pub async fn register_impl(
	ctx: &mut impl MessageContext,
	kind: &str,
	rsn: &str,
	now: NaiveDateTime,
) -> Result<(), TaggedError> {
	let is_main = parse_kind(kind)?;
	let rsn = normalize_rsn(rsn);
	let discord_id = ctx.author_id().to_string();

	register_account(ctx.data(), &discord_id, &rsn, is_main, now)?;
	ctx.reply(&format!(
		"Registered {rsn} as your {} account.",
		kind_name(is_main)
	))
	.await?;

	Ok(())
}

/// Links a clan member to your discord account.
#[poise::command(prefix_command)]
pub async fn register(
	mut ctx: PoiseContext<'_>,
	#[description = "Either `main` or `alt`"] kind: String,
	#[rest]
	#[description = "Name of the account"]
	rsn: String,
) -> Result<(), Error> {
	let res = register_impl(&mut ctx, &kind, &rsn, Utc::now().naive_utc()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Change
pub async fn change_impl(
	ctx: &mut impl MessageContext,
	kind: &str,
	old_rsn: &str,
	new_rsn: &str,
	now: NaiveDateTime,
) -> Result<(), TaggedError> {
	let is_main = parse_kind(kind)?;
	let old_rsn = normalize_rsn(old_rsn);
	let new_rsn = normalize_rsn(new_rsn);
	let discord_id = ctx.author_id().to_string();

	change_name(ctx.data(), &discord_id, &old_rsn, &new_rsn, is_main, now)?;
	ctx.reply(&format!(
		"Changed your {} account from {old_rsn} to {new_rsn}.",
		kind_name(is_main)
	))
	.await?;

	Ok(())
}

/// Moves your registration over to a new name. Names with spaces must be quoted.
#[poise::command(prefix_command)]
pub async fn change(
	mut ctx: PoiseContext<'_>,
	#[description = "Either `main` or `alt`"] kind: String,
	#[description = "Current name"] old_rsn: String,
	#[description = "New name"] new_rsn: String,
) -> Result<(), Error> {
	let res = change_impl(&mut ctx, &kind, &old_rsn, &new_rsn, Utc::now().naive_utc()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Roster
/// Clan roster management
#[poise::command(
	prefix_command,
	subcommands("add", "remove", "list"),
	subcommand_required,
	required_permissions = "MANAGE_GUILD"
)]
pub async fn roster(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}

pub async fn add_impl(ctx: &mut impl MessageContext, rsn: &str) -> Result<(), TaggedError> {
	let rsn = normalize_rsn(rsn);
	if rsn.is_empty() {
		return Err(user_error!("Usage: `$roster add <rsn>`."));
	}

	if roster::add(ctx.data(), &rsn, None)? {
		ctx.reply(&format!("Added {rsn} to the roster.")).await?;
	} else {
		ctx.reply(&format!("{rsn} is already on the roster.")).await?;
	}

	Ok(())
}

/// Starts tracking a clan member.
#[poise::command(prefix_command)]
async fn add(mut ctx: PoiseContext<'_>, #[rest] rsn: String) -> Result<(), Error> {
	let res = add_impl(&mut ctx, &rsn).await;
	ctx.handle_error(res).await?;
	Ok(())
}

pub async fn remove_impl(ctx: &mut impl MessageContext, rsn: &str) -> Result<(), TaggedError> {
	let rsn = normalize_rsn(rsn);
	if roster::remove(ctx.data(), &rsn)? {
		ctx.reply(&format!("Removed {rsn} from the roster.")).await?;
	} else {
		ctx.reply(&format!("{rsn} is not on the roster.")).await?;
	}

	Ok(())
}

/// Stops tracking a clan member, forgetting their caps and xp history.
#[poise::command(prefix_command)]
async fn remove(mut ctx: PoiseContext<'_>, #[rest] rsn: String) -> Result<(), Error> {
	let res = remove_impl(&mut ctx, &rsn).await;
	ctx.handle_error(res).await?;
	Ok(())
}

pub async fn list_impl(ctx: &mut impl MessageContext) -> Result<(), TaggedError> {
	let members = roster::list(ctx.data())?;
	if members.is_empty() {
		ctx.reply("The roster is empty.").await?;
	} else {
		ctx.reply(&format!(
			"Tracked members ({}): {}",
			members.len(),
			members.join(", ")
		))
		.await?;
	}

	Ok(())
}

/// Lists every tracked clan member.
#[poise::command(prefix_command)]
async fn list(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = list_impl(&mut ctx).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod tests {
	use super::*;
	use crate::commands::discord::mock::MockContext;
	use crate::golden_test;

	fn now() -> NaiveDateTime {
		NaiveDateTime::parse_from_str("2026-10-17 12:00", "%Y-%m-%d %H:%M").unwrap()
	}

	golden_test!(roster_management, "commands/account/roster_management");
	async fn roster_management(ctx: &mut MockContext) -> Result<(), TaggedError> {
		list_impl(ctx).await?;
		add_impl(ctx, "Zezima").await?;
		add_impl(ctx, "zezima").await?;
		add_impl(ctx, "Durial321").await?;
		list_impl(ctx).await?;
		remove_impl(ctx, "Durial321").await?;
		remove_impl(ctx, "Durial321").await?;
		Ok(())
	}

	golden_test!(registration, "commands/account/registration");
	async fn registration(ctx: &mut MockContext) -> Result<(), TaggedError> {
		for rsn in ["Zezima", "Zezima2", "Durial321"] {
			roster::add(ctx.data(), rsn, None)?;
		}

		register_impl(ctx, "main", "Zezima", now()).await?;
		register_impl(ctx, "alt", "Durial321", now()).await?;
		change_impl(ctx, "main", "Zezima", "Zezima2", now()).await?;

		let res = register_impl(ctx, "main", "Zezima", now()).await;
		ctx.handle_error(res).await?;
		let res = register_impl(ctx, "pure", "Zezima", now()).await;
		ctx.handle_error(res).await?;
		Ok(())
	}

	#[tokio::test]
	async fn others_cannot_steal_names() -> Result<(), Error> {
		let (mut ctx, _guard) = crate::context::testing::get_mock_context()?;
		roster::add(&ctx.data, "Zezima", None)?;

		let res = register_impl(&mut ctx, "main", "Zezima", now()).await;
		ctx.handle_error(res).await?;

		ctx.user_id = 777;
		let res = register_impl(&mut ctx, "alt", "ZEZIMA", now()).await;
		ctx.handle_error(res).await?;

		assert_eq!(
			ctx.messages,
			vec![
				"Registered Zezima as your main account.",
				"Username ZEZIMA already registered."
			]
		);
		Ok(())
	}
}
// }}}
