#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// Pet drop chances, taking the same arguments as `$pet`
	Pet(crate::commands::calc::Args),

	/// Telos calculations, taking the same arguments as `$telos`
	Telos(crate::commands::calc::Args),

	/// Lists the caps which have not been reported yet
	Caps,

	/// Records a single xp snapshot for every roster member
	Xp,

	/// Manages the tracked clan members
	#[command(subcommand)]
	Roster(crate::commands::roster::RosterCommand),
}
