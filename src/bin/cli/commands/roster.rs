use crate::context::CliContext;
use mathbot::commands::account::{add_impl, list_impl, remove_impl};
use mathbot::commands::discord::MessageContext;
use mathbot::context::{Error, UserContext};

#[derive(clap::Subcommand)]
pub enum RosterCommand {
	/// Starts tracking a player
	Add { rsn: Vec<String> },
	/// Stops tracking a player
	Remove { rsn: Vec<String> },
	/// Lists the tracked players
	List,
}

pub async fn run(command: RosterCommand) -> Result<(), Error> {
	let mut ctx = CliContext::new(UserContext::new()?)?;
	let res = match command {
		RosterCommand::Add { rsn } => add_impl(&mut ctx, &rsn.join(" ")).await,
		RosterCommand::Remove { rsn } => remove_impl(&mut ctx, &rsn.join(" ")).await,
		RosterCommand::List => list_impl(&mut ctx).await,
	};

	ctx.handle_error(res).await?;
	Ok(())
}
