//! Links between discord users and the game accounts they own.

// {{{ Imports
use chrono::NaiveDateTime;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

use crate::context::{Error, TaggedError, UserContext};
use crate::runescape::roster::{self, normalize_rsn};
use crate::user_error;
// }}}

// {{{ Owned accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedAccount {
	pub id: u32,
	pub discord_id: String,
	pub rsn: String,
	pub is_main: bool,
	pub start_dtg: NaiveDateTime,
	pub end_dtg: Option<NaiveDateTime>,
}

impl OwnedAccount {
	#[inline]
	fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
		Ok(Self {
			id: row.get("id")?,
			discord_id: row.get("discord_id")?,
			rsn: row.get("rsn")?,
			is_main: row.get("is_main")?,
			start_dtg: row.get("start_dtg")?,
			end_dtg: row.get("end_dtg")?,
		})
	}

	/// Returns the current owner of some account, if any.
	pub fn current(ctx: &UserContext, rsn: &str) -> Result<Option<Self>, Error> {
		let account = ctx
			.db
			.get()?
			.prepare_cached("SELECT * FROM account_owned WHERE rsn = ? AND end_dtg IS NULL")?
			.query_row([rsn], Self::from_row)
			.optional()?;

		Ok(account)
	}

	/// Every account some user currently owns, mains first.
	pub fn by_discord_id(ctx: &UserContext, discord_id: &str) -> Result<Vec<Self>, Error> {
		let accounts = ctx
			.db
			.get()?
			.prepare_cached(
				"
          SELECT * FROM account_owned
          WHERE discord_id = ? AND end_dtg IS NULL
          ORDER BY is_main DESC, start_dtg
        ",
			)?
			.query_map([discord_id], Self::from_row)?
			.collect::<Result<_, _>>()?;

		Ok(accounts)
	}
}
// }}}
// {{{ Registration
fn ensure_on_roster(ctx: &UserContext, rsn: &str) -> Result<(), TaggedError> {
	if !roster::contains(ctx, rsn)? {
		return Err(user_error!("Username {rsn} not found in clan database."));
	}

	Ok(())
}

fn already_registered(rsn: &str) -> TaggedError {
	user_error!("Username {rsn} already registered.")
}

fn main_already_registered() -> TaggedError {
	user_error!(
		"You already have a main account registered. Use `$change main <old_name> <new_name>` to change your name."
	)
}

/// Inserts a current ownership row.
///
/// The unique indices on `account_owned` have the final say on conflicts,
/// even when two registrations race past the checks above them.
fn insert_ownership(
	conn: &Connection,
	discord_id: &str,
	rsn: &str,
	is_main: bool,
	now: NaiveDateTime,
) -> Result<(), TaggedError> {
	let res = conn
		.prepare_cached(
			"INSERT INTO account_owned(discord_id, rsn, is_main, start_dtg) VALUES (?, ?, ?, ?)",
		)?
		.execute((discord_id, rsn, is_main, now));

	match res {
		Ok(_) => Ok(()),
		Err(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
			let message = err.to_string();
			if message.contains("account_owned.rsn") {
				Err(already_registered(rsn))
			} else if message.contains("account_owned.discord_id") {
				Err(main_already_registered())
			} else {
				Err(err.into())
			}
		}
		Err(err) => Err(err.into()),
	}
}

/// Marks a roster member as owned by a discord user.
///
/// Users can own any number of alts but only a single main.
pub fn register(
	ctx: &UserContext,
	discord_id: &str,
	rsn: &str,
	is_main: bool,
	now: NaiveDateTime,
) -> Result<(), TaggedError> {
	let rsn = normalize_rsn(rsn);
	ensure_on_roster(ctx, &rsn)?;

	if OwnedAccount::current(ctx, &rsn)?.is_some() {
		return Err(already_registered(&rsn));
	}

	if is_main
		&& OwnedAccount::by_discord_id(ctx, discord_id)?
			.iter()
			.any(|account| account.is_main)
	{
		return Err(main_already_registered());
	}

	let mut conn = ctx.db.get()?;
	let tx = conn.transaction()?;
	tx.prepare_cached("INSERT OR IGNORE INTO account(discord_id) VALUES (?)")?
		.execute([discord_id])?;
	insert_ownership(&tx, discord_id, &rsn, is_main, now)?;
	tx.commit()?;

	Ok(())
}

/// Moves ownership from an old name to a new one.
///
/// The old ownership is kept around as history, closed at `now`.
pub fn change_name(
	ctx: &UserContext,
	discord_id: &str,
	old_rsn: &str,
	new_rsn: &str,
	is_main: bool,
	now: NaiveDateTime,
) -> Result<(), TaggedError> {
	let old_rsn = normalize_rsn(old_rsn);
	let new_rsn = normalize_rsn(new_rsn);
	ensure_on_roster(ctx, &new_rsn)?;

	let old = OwnedAccount::current(ctx, &old_rsn)?
		.filter(|account| account.discord_id == discord_id && account.is_main == is_main)
		.ok_or_else(|| user_error!("You do not currently own username {old_rsn}."))?;

	if OwnedAccount::current(ctx, &new_rsn)?.is_some() {
		return Err(already_registered(&new_rsn));
	}

	let mut conn = ctx.db.get()?;
	let tx = conn.transaction()?;
	tx.prepare_cached("UPDATE account_owned SET end_dtg = ? WHERE id = ?")?
		.execute((now, old.id))?;
	insert_ownership(&tx, discord_id, &new_rsn, is_main, now)?;
	tx.commit()?;

	Ok(())
}
// }}}
