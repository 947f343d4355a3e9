// {{{ Imports
use db::{connect_db, SqlitePool};

use crate::context::config::BotConfig;
use crate::context::paths::MathbotPaths;
use crate::runescape::alog::RuneMetrics;
use crate::runescape::drops::DropTable;
use crate::timed;
// }}}

pub mod config;
pub mod db;
pub mod paths;

// {{{ Common types
pub type Error = anyhow::Error;
pub type PoiseContext<'a> = poise::Context<'a, UserContext, Error>;
// }}}
// {{{ Error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	User,
	Internal,
}

#[derive(Debug)]
pub struct TaggedError {
	pub kind: ErrorKind,
	pub error: Error,
}

impl TaggedError {
	#[inline]
	pub fn new(kind: ErrorKind, error: Error) -> Self {
		Self { kind, error }
	}
}

impl<E: Into<Error>> From<E> for TaggedError {
	fn from(value: E) -> Self {
		Self::new(ErrorKind::Internal, value.into())
	}
}

pub trait TagError {
	fn tag(self, tag: ErrorKind) -> TaggedError;
}

impl TagError for Error {
	fn tag(self, tag: ErrorKind) -> TaggedError {
		TaggedError::new(tag, self)
	}
}

/// Shorthand for building an error which should be shown to the user as-is.
#[macro_export]
macro_rules! user_error {
	($($arg:tt)*) => {
		$crate::context::TagError::tag(
			::anyhow::anyhow!($($arg)*),
			$crate::context::ErrorKind::User,
		)
	};
}
// }}}
// {{{ UserContext
/// Custom user data passed to all command functions
#[derive(Clone)]
pub struct UserContext {
	pub db: SqlitePool,
	pub paths: MathbotPaths,
	pub config: BotConfig,
	pub drop_table: &'static DropTable,
	pub alog: RuneMetrics,
}

impl UserContext {
	#[inline]
	pub fn new() -> Result<Self, Error> {
		timed!("create_context", {
			let paths = MathbotPaths::new()?;
			let config = BotConfig::from_env()?;
			Self::with_config(paths, config)
		})
	}

	pub fn with_config(paths: MathbotPaths, config: BotConfig) -> Result<Self, Error> {
		let db = connect_db(&paths)?;
		let drop_table = DropTable::get()?;
		let alog = RuneMetrics::new(&config.player_url)?;

		Ok(Self {
			db,
			paths,
			config,
			drop_table,
			alog,
		})
	}
}
// }}}
