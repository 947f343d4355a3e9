use clap::Parser;
use command::{Cli, Command};
use mathbot::context::paths::MathbotPaths;
use mathbot::context::Error;
use mathbot::logs::init_logging;

mod command;
mod commands;
mod context;

#[tokio::main]
async fn main() -> Result<(), Error> {
	let cli = Cli::parse();
	let _guard = init_logging(&MathbotPaths::new()?)?;

	match cli.command {
		Command::Pet(args) => commands::calc::run_pet(args).await?,
		Command::Telos(args) => commands::calc::run_telos(args).await?,
		Command::Caps => commands::sweep::run_caps().await?,
		Command::Xp => commands::sweep::run_xp().await?,
		Command::Roster(command) => commands::roster::run(command).await?,
	}

	Ok(())
}
