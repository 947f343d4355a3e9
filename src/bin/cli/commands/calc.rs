use crate::context::CliContext;
use mathbot::commands::discord::MessageContext;
use mathbot::commands::{pet::pet_impl, telos::telos_impl};
use mathbot::context::{Error, UserContext};

#[derive(clap::Args)]
pub struct Args {
	/// Arguments, exactly as typed after the chat command
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	args: Vec<String>,
}

pub async fn run_pet(args: Args) -> Result<(), Error> {
	let mut ctx = CliContext::new(UserContext::new()?)?;
	let res = pet_impl(&mut ctx, &args.args.join(" ")).await;
	ctx.handle_error(res).await?;
	Ok(())
}

pub async fn run_telos(args: Args) -> Result<(), Error> {
	let mut ctx = CliContext::new(UserContext::new()?)?;
	let res = telos_impl(&mut ctx, &args.args.join(" ")).await;
	ctx.handle_error(res).await?;
	Ok(())
}
