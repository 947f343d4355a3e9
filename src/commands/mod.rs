use crate::context::{Error, PoiseContext};

pub mod account;
pub mod cap;
pub mod discord;
pub mod pet;
pub mod rs;
pub mod telos;
pub mod utils;
pub mod xp;

// {{{ Help
/// Show this help menu
#[poise::command(prefix_command, track_edits)]
pub async fn help(
	ctx: PoiseContext<'_>,
	#[description = "Specific command to show help about"] command: Option<String>,
) -> Result<(), Error> {
	poise::builtins::help(
		ctx,
		command.as_deref(),
		poise::builtins::HelpConfiguration {
			extra_text_at_bottom: "Most commands also accept `help` as an argument, like `$pet help`.",
			show_subcommands: true,
			..Default::default()
		},
	)
	.await?;
	Ok(())
}
// }}}

/// Every command the bot answers to.
pub fn all() -> Vec<poise::Command<crate::context::UserContext, Error>> {
	vec![
		help(),
		pet::pet(),
		pet::bosslist(),
		pet::droplist(),
		pet::drop(),
		telos::telos(),
		cap::cap(),
		xp::xp(),
		xp::skill(),
		xp::skilllist(),
		account::register(),
		account::change(),
		account::roster(),
		rs::alog(),
		rs::reset(),
		rs::araxxor(),
		rs::roll(),
	]
}
