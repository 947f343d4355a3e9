// {{{ Imports
use mathbot::commands::discord::MessageContext;
use mathbot::context::paths::get_var;
use mathbot::context::{Error, UserContext};
// }}}

/// Similar in scope to [mathbot::commands::discord::mock::MockContext],
/// except replies are printed to the standard output.
pub struct CliContext {
	pub user_id: u64,
	pub data: UserContext,
}

impl CliContext {
	pub fn new(data: UserContext) -> Result<Self, Error> {
		let user_id = match get_var("MATHBOT_DISCORD_USER_ID") {
			Ok(id) => id.parse()?,
			Err(_) => 0,
		};

		Ok(Self { data, user_id })
	}
}

impl MessageContext for CliContext {
	fn author_id(&self) -> u64 {
		self.user_id
	}

	fn data(&self) -> &UserContext {
		&self.data
	}

	async fn reply(&mut self, text: &str) -> Result<(), Error> {
		println!("[Reply] {text}");
		Ok(())
	}
}
