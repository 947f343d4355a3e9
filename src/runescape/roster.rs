//! The clan members tracked by the periodic sweeps.

use crate::context::{Error, UserContext};

/// Normalizes a player name as typed by users or returned by the game.
///
/// The game renders spaces inside names as non-breaking spaces.
pub fn normalize_rsn(rsn: &str) -> String {
	rsn.replace('\u{a0}', " ").trim().to_owned()
}

/// Adds a player to the roster, returning `false` if they were already on it.
pub fn add(ctx: &UserContext, rsn: &str, clan_rank: Option<&str>) -> Result<bool, Error> {
	let changed = ctx
		.db
		.get()?
		.prepare_cached("INSERT OR IGNORE INTO rs(rsn, clan_rank) VALUES (?, ?)")?
		.execute((normalize_rsn(rsn), clan_rank))?;

	Ok(changed > 0)
}

/// Removes a player from the roster, together with everything recorded about them.
pub fn remove(ctx: &UserContext, rsn: &str) -> Result<bool, Error> {
	let changed = ctx
		.db
		.get()?
		.prepare_cached("DELETE FROM rs WHERE rsn = ?")?
		.execute([normalize_rsn(rsn)])?;

	Ok(changed > 0)
}

pub fn contains(ctx: &UserContext, rsn: &str) -> Result<bool, Error> {
	let exists = ctx
		.db
		.get()?
		.prepare_cached("SELECT EXISTS(SELECT 1 FROM rs WHERE rsn = ?)")?
		.query_row([normalize_rsn(rsn)], |row| row.get(0))?;

	Ok(exists)
}

/// Every tracked player, in alphabetical order.
pub fn list(ctx: &UserContext) -> Result<Vec<String>, Error> {
	let names = ctx
		.db
		.get()?
		.prepare_cached("SELECT rsn FROM rs ORDER BY rsn COLLATE NOCASE")?
		.query_map((), |row| row.get(0))?
		.collect::<Result<_, _>>()?;

	Ok(names)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::testing::get_test_context;

	#[test]
	fn add_list_remove() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;

		assert!(add(&ctx, "Zezima", None)?);
		assert!(add(&ctx, "  b0aty\u{a0}hcim ", Some("general"))?);
		assert!(!add(&ctx, "zezima", None)?, "names are case insensitive");

		assert_eq!(list(&ctx)?, vec!["b0aty hcim", "Zezima"]);
		assert!(contains(&ctx, "B0aty hcim")?);

		assert!(remove(&ctx, "ZEZIMA")?);
		assert!(!remove(&ctx, "zezima")?);
		assert_eq!(list(&ctx)?, vec!["b0aty hcim"]);
		Ok(())
	}
}
