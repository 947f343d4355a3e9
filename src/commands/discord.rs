use crate::context::{Error, ErrorKind, TaggedError, UserContext};

// {{{ Trait
pub trait MessageContext {
	/// Get the user context held by the message
	fn data(&self) -> &UserContext;
	fn author_id(&self) -> u64;

	/// Reply to the current message
	async fn reply(&mut self, text: &str) -> Result<(), Error>;

	/// Replies with the message of user errors, and propagates internal ones.
	async fn handle_error<V>(&mut self, res: Result<V, TaggedError>) -> Result<Option<V>, Error> {
		match res {
			Ok(v) => Ok(Some(v)),
			Err(e) => match e.kind {
				ErrorKind::User => {
					self.reply(&format!("{}", e.error)).await?;
					Ok(None)
				}
				ErrorKind::Internal => Err(e.error),
			},
		}
	}
}
// }}}
// {{{ Poise implementation
impl<'a> MessageContext for poise::Context<'a, UserContext, Error> {
	fn data(&self) -> &UserContext {
		Self::data(*self)
	}

	fn author_id(&self) -> u64 {
		self.author().id.get()
	}

	async fn reply(&mut self, text: &str) -> Result<(), Error> {
		Self::reply(*self, text).await?;
		Ok(())
	}
}
// }}}
// {{{ Testing context
pub mod mock {
	use std::{env, fs, path::PathBuf};

	use serde::{Deserialize, Serialize};

	use super::*;

	/// The parts of a reply golden tests care about.
	#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
	pub struct ReplyEssence {
		pub content: String,
	}

	pub struct MockContext {
		pub user_id: u64,
		pub data: UserContext,
		pub messages: Vec<String>,
	}

	impl MockContext {
		pub fn new(data: UserContext) -> Self {
			Self {
				data,
				user_id: 666,
				messages: vec![],
			}
		}

		/// Compares the replies with the ones previously saved at some path,
		/// saving them when missing.
		///
		/// Setting `MATHBOT_TEST_REGEN=1` regenerates every saved reply.
		pub fn golden(&self, path: &PathBuf) -> Result<(), Error> {
			if env::var("MATHBOT_TEST_REGEN").unwrap_or_default() == "1" && path.exists() {
				fs::remove_dir_all(path)?;
			}

			fs::create_dir_all(path)?;
			for (i, content) in self.messages.iter().enumerate() {
				let dir = path.join(format!("{i}"));
				fs::create_dir_all(&dir)?;
				let message_file = dir.join("message.toml");

				let essence = ReplyEssence {
					content: content.clone(),
				};

				if message_file.exists() {
					let saved: ReplyEssence = toml::from_str(&fs::read_to_string(message_file)?)?;
					assert_eq!(essence, saved);
				} else {
					fs::write(&message_file, toml::to_string_pretty(&essence)?)?;
				}
			}

			Ok(())
		}
	}

	impl MessageContext for MockContext {
		fn author_id(&self) -> u64 {
			self.user_id
		}

		fn data(&self) -> &UserContext {
			&self.data
		}

		async fn reply(&mut self, text: &str) -> Result<(), Error> {
			self.messages.push(text.to_owned());
			Ok(())
		}
	}
}
// }}}
