// {{{ Imports
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use poise::serenity_prelude::{ChannelId, Http};

use crate::commands::discord::MessageContext;
use crate::commands::utils::help_table::HelpTable;
use crate::context::{Error, PoiseContext, TaggedError};
use crate::runescape::alog::AlogSource;
use crate::runescape::caps::{caps, caps_since, last_cap, report_caps, CapRecord, CapSink};
use crate::runescape::clock::last_build_tick;
use crate::runescape::roster::normalize_rsn;
use crate::user_error;
use crate::utils::code_block;
// }}}

// {{{ Cap channel
/// The discord channel cap reports get posted to.
#[derive(Clone)]
pub struct CapChannel {
	pub http: Arc<Http>,
	pub channel: ChannelId,
}

impl CapChannel {
	pub fn new(http: Arc<Http>, channel: u64) -> Self {
		Self {
			http,
			channel: ChannelId::new(channel),
		}
	}
}

impl CapSink for CapChannel {
	async fn post(&self, text: &str) -> Result<(), Error> {
		self.channel.say(&*self.http, text).await?;
		Ok(())
	}
}
// }}}

fn format_tick(tick: NaiveDateTime) -> String {
	format!("{} at {}", tick.format("%d-%b-%Y"), tick.format("%H:%M"))
}

// {{{ Toplevel
/// Citadel cap tracking. Try `$cap help`.
#[poise::command(
	prefix_command,
	subcommands("list", "force", "recheck", "tick", "cap_help"),
	subcommand_required
)]
pub async fn cap(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}
// }}}
// {{{ List
pub async fn list_impl(ctx: &mut impl MessageContext, now: NaiveDateTime) -> Result<(), TaggedError> {
	let tick = last_build_tick(now);
	let recent = caps_since(ctx.data(), tick)?;

	let out = if recent.is_empty() {
		format!("Nobody has capped since the build tick on {}.", format_tick(tick))
	} else {
		let mut out = format!("Caps since the build tick on {}:\n", format_tick(tick));
		for (i, record) in recent.iter().enumerate() {
			out.push_str(&format!(
				"{}. {} ({})\n",
				i + 1,
				record.rsn,
				format_tick(record.capped_at)
			));
		}
		out
	};

	ctx.reply(&code_block(out.trim_end())).await?;
	Ok(())
}

/// Lists everyone who capped this week.
#[poise::command(prefix_command)]
async fn list(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = list_impl(&mut ctx, Utc::now().naive_utc()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Force
pub async fn force_impl(ctx: &mut impl MessageContext, target: &str) -> Result<(), TaggedError> {
	let target = normalize_rsn(target);
	let lines: Vec<String> = if target.eq_ignore_ascii_case("all") {
		caps(ctx.data())?.iter().map(CapRecord::to_string).collect()
	} else {
		last_cap(ctx.data(), &target)?
			.iter()
			.map(CapRecord::to_string)
			.collect()
	};

	if lines.is_empty() {
		ctx.reply(&format!("No caps recorded for {target}.")).await?;
	} else {
		ctx.reply(&lines.join("\n")).await?;
	}

	Ok(())
}

/// Reports the last recorded cap of someone, or of everyone.
#[poise::command(prefix_command)]
async fn force(
	mut ctx: PoiseContext<'_>,
	#[rest]
	#[description = "Player name, or `all`"]
	target: String,
) -> Result<(), Error> {
	let res = force_impl(&mut ctx, &target).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Recheck
/// Runs a cap sweep right away, posting new caps to `sink` like the periodic
/// sweep does.
pub async fn recheck_impl(
	ctx: &mut impl MessageContext,
	source: &impl AlogSource,
	sink: &impl CapSink,
	now: NaiveDateTime,
) -> Result<(), TaggedError> {
	let reports = report_caps(ctx.data(), source, sink, now).await?;

	match reports.len() {
		0 => ctx.reply("No new caps.").await?,
		1 => ctx.reply("Reported 1 new cap.").await?,
		n => ctx.reply(&format!("Reported {n} new caps.")).await?,
	}

	Ok(())
}

/// Checks every log for new caps right away.
#[poise::command(prefix_command, user_cooldown = 60)]
async fn recheck(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let alog = ctx.data().alog.clone();
	let channel = ctx
		.data()
		.config
		.cap_channel
		.map(|id| CapChannel::new(ctx.serenity_context().http.clone(), id));

	let res = match channel {
		Some(channel) => recheck_impl(&mut ctx, &alog, &channel, Utc::now().naive_utc()).await,
		None => Err(user_error!("No cap channel is configured.")),
	};

	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tick
pub async fn tick_impl(ctx: &mut impl MessageContext, now: NaiveDateTime) -> Result<(), TaggedError> {
	ctx.reply(&format!(
		"Last build tick: {}",
		format_tick(last_build_tick(now))
	))
	.await?;
	Ok(())
}

/// Shows when the last build tick happened.
#[poise::command(prefix_command)]
async fn tick(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = tick_impl(&mut ctx, Utc::now().naive_utc()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Help
pub fn cap_help_text() -> String {
	HelpTable::new("Cap Cog")
		.row("$cap list", "Lists everyone who capped since the last build tick.")
		.row("$cap force <rsn>", "Reports the last recorded cap of a player.")
		.row("$cap force all", "Reports the last recorded cap of everyone.")
		.row("$cap recheck", "Checks every adventurer's log and reports new caps.")
		.row("$cap tick", "Shows the last build tick.")
		.row("$cap help", "Returns this message.")
		.render()
}

#[poise::command(prefix_command, rename = "help")]
async fn cap_help(ctx: PoiseContext<'_>) -> Result<(), Error> {
	ctx.say(cap_help_text()).await?;
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
	use crate::runescape::caps::record_cap;
	use crate::runescape::caps::tests::MemorySink;
	use crate::runescape::roster;

	fn at(s: &str) -> NaiveDateTime {
		NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
	}

	#[tokio::test]
	async fn recheck_posts_to_the_cap_channel() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		roster::add(&ctx.data, "Zezima", None)?;
		let source = FakeAlog::default().with("Zezima", Some(sample_profile()));
		let channel = MemorySink::default();

		for _ in 0..2 {
			let res = recheck_impl(&mut ctx, &source, &channel, at("2026-10-14 12:00")).await;
			ctx.handle_error(res).await?;
		}

		assert_eq!(ctx.messages, vec!["Reported 1 new cap.", "No new caps."]);
		assert_eq!(
			channel.posted(),
			vec!["Zezima has capped at the citadel on 14-Oct-2026 at 09:05."]
		);
		Ok(())
	}

	#[tokio::test]
	async fn recheck_retries_failed_posts() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		roster::add(&ctx.data, "Zezima", None)?;
		let source = FakeAlog::default().with("Zezima", Some(sample_profile()));
		let now = at("2026-10-14 12:00");

		let res = recheck_impl(&mut ctx, &source, &MemorySink::failing(), now).await;
		ctx.handle_error(res).await?;

		let channel = MemorySink::default();
		let res = recheck_impl(&mut ctx, &source, &channel, now).await;
		ctx.handle_error(res).await?;

		assert_eq!(ctx.messages, vec!["No new caps.", "Reported 1 new cap."]);
		assert_eq!(channel.posted().len(), 1);
		Ok(())
	}

	#[tokio::test]
	async fn force_uses_the_roster_name() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		roster::add(&ctx.data, "Zezima", None)?;
		record_cap(&ctx.data, "Zezima", at("2026-10-14 09:05"))?;

		let res = force_impl(&mut ctx, "zEzImA").await;
		ctx.handle_error(res).await?;
		assert_eq!(
			ctx.messages,
			vec!["Zezima has capped at the citadel on 14-Oct-2026 at 09:05."]
		);
		Ok(())
	}

	#[tokio::test]
	async fn force_unknown_player() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		let res = force_impl(&mut ctx, "Nobody").await;
		ctx.handle_error(res).await?;
		assert_eq!(ctx.messages, vec!["No caps recorded for Nobody."]);
		Ok(())
	}

	golden_test!(weekly_caps, "commands/cap/weekly_caps");
	async fn weekly_caps(ctx: &mut MockContext) -> Result<(), TaggedError> {
		let now = at("2026-10-17 12:00");
		for rsn in ["Zezima", "Durial321", "Lazy"] {
			roster::add(ctx.data(), rsn, None)?;
		}

		list_impl(ctx, now).await?;
		record_cap(ctx.data(), "Zezima", at("2026-10-15 08:30"))?;
		record_cap(ctx.data(), "Durial321", at("2026-10-14 17:00"))?;
		record_cap(ctx.data(), "Lazy", at("2026-10-10 10:00"))?;

		list_impl(ctx, now).await?;
		force_impl(ctx, "all").await?;
		force_impl(ctx, "zezima").await?;
		tick_impl(ctx, now).await?;
		Ok(())
	}
}
// }}}
