use std::sync::Arc;

use chrono::Utc;
use poise::serenity_prelude::{self as serenity, Http};
use tracing::{error, info};

use mathbot::commands;
use mathbot::commands::cap::CapChannel;
use mathbot::context::config::BotConfig;
use mathbot::context::paths::{get_var, MathbotPaths};
use mathbot::context::{Error, UserContext};
use mathbot::logs::init_logging;
use mathbot::periodic::spawn_periodic;
use mathbot::runescape::caps::report_caps;
use mathbot::runescape::xp::snapshot_xp;

// {{{ Error handler
async fn on_error(error: poise::FrameworkError<'_, UserContext, Error>) {
	if let Err(e) = poise::builtins::on_error(error).await {
		error!("Error while handling error: {e}")
	}
}
// }}}
// {{{ Background sweeps
fn spawn_sweeps(data: &UserContext, http: Arc<Http>) {
	match data.config.cap_channel {
		Some(channel) => {
			let data = data.clone();
			let channel = CapChannel::new(http, channel);
			spawn_periodic("cap_sweep", data.config.cap_interval, move || {
				let data = data.clone();
				let channel = channel.clone();
				async move {
					report_caps(&data, &data.alog, &channel, Utc::now().naive_utc()).await?;
					Ok(())
				}
			});
		}
		None => info!("$MATHBOT_CAP_CHANNEL is not set, cap reports are disabled"),
	}

	let data = data.clone();
	spawn_periodic("xp_sweep", data.config.xp_interval, move || {
		let data = data.clone();
		async move {
			snapshot_xp(&data, &data.alog, Utc::now().naive_utc()).await?;
			Ok(())
		}
	});
}
// }}}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let paths = MathbotPaths::new()?;
	let _guard = init_logging(&paths)?;

	// {{{ Poise options
	let options = poise::FrameworkOptions {
		commands: commands::all(),
		prefix_options: poise::PrefixFrameworkOptions {
			prefix: Some("$".into()),
			..Default::default()
		},
		on_error: |error| Box::pin(on_error(error)),
		..Default::default()
	};
	// }}}
	// {{{ Start poise
	let framework = poise::Framework::builder()
		.setup(move |ctx, ready, _framework| {
			Box::pin(async move {
				info!("Logged in as {}", ready.user.name);
				let data = UserContext::with_config(paths, BotConfig::from_env()?)?;
				spawn_sweeps(&data, ctx.http.clone());
				Ok(data)
			})
		})
		.options(options)
		.build();

	let token = get_var("MATHBOT_DISCORD_TOKEN")?;
	let intents =
		serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

	let mut client = serenity::ClientBuilder::new(token, intents)
		.framework(framework)
		.await?;

	client.start().await?;
	Ok(())
	// }}}
}
