use std::collections::BTreeMap;
use std::sync::OnceLock;

use anyhow::Context;
use serde::Deserialize;

use crate::context::Error;

pub const DROPRATES_DATA: &[u8] = include_bytes!("droprates.json");

// {{{ Pet rates
/// A rubber-banded drop: the chance improves every `threshold` kills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PetRate {
	/// Drop rate denominator for the first threshold segment.
	pub rate: u32,
	pub threshold: u32,
}
// }}}
// {{{ Boss drops
#[derive(Debug, Clone, Deserialize)]
pub struct BossDrops {
	#[serde(default)]
	pub pet: Option<PetRate>,

	#[serde(default, rename = "pet (hm)")]
	pub pet_hm: Option<PetRate>,

	/// Flat drop rate denominators, keyed by lowercase item name.
	#[serde(default)]
	pub drops: BTreeMap<String, u32>,
}

impl BossDrops {
	/// Lists the drops of this boss, pets included.
	pub fn drop_names(&self) -> Vec<&str> {
		let mut names = Vec::with_capacity(self.drops.len() + 2);
		if self.pet.is_some() {
			names.push("pet");
		}
		if self.pet_hm.is_some() {
			names.push("pet (hm)");
		}
		names.extend(self.drops.keys().map(String::as_str));
		names
	}
}
// }}}
// {{{ Drop table
/// Static reference data about boss drops, keyed by lowercase boss name.
#[derive(Debug, Clone)]
pub struct DropTable {
	bosses: BTreeMap<String, BossDrops>,
}

impl DropTable {
	/// Returns the table bundled with the binary, parsing it on first use.
	pub fn get() -> Result<&'static Self, Error> {
		static CELL: OnceLock<DropTable> = OnceLock::new();
		if let Some(table) = CELL.get() {
			return Ok(table);
		}

		let table = Self::from_json(DROPRATES_DATA)?;
		Ok(CELL.get_or_init(|| table))
	}

	pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
		let raw: BTreeMap<String, BossDrops> =
			serde_json::from_slice(bytes).context("Could not parse drop rate table")?;

		let bosses = raw
			.into_iter()
			.map(|(name, mut drops)| {
				drops.drops = drops
					.drops
					.into_iter()
					.map(|(item, rate)| (item.to_lowercase(), rate))
					.collect();
				(name.to_lowercase(), drops)
			})
			.collect();

		Ok(Self { bosses })
	}

	/// Boss names in alphabetical order.
	pub fn bosses(&self) -> impl Iterator<Item = &str> {
		self.bosses.keys().map(String::as_str)
	}

	pub fn lookup(&self, boss: &str) -> Option<&BossDrops> {
		self.bosses.get(&boss.trim().to_lowercase())
	}

	/// Every drop of a boss, pets first.
	pub fn drops(&self, boss: &str) -> Option<Vec<&str>> {
		self.lookup(boss).map(BossDrops::drop_names)
	}

	/// Drop rate denominator of an item, pets included.
	pub fn drop_rate(&self, boss: &str, item: &str) -> Option<u32> {
		let drops = self.lookup(boss)?;
		match item.trim().to_lowercase().as_str() {
			"pet" => drops.pet.map(|pet| pet.rate),
			"pet (hm)" => drops.pet_hm.map(|pet| pet.rate),
			item => drops.drops.get(item).copied(),
		}
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_table_parses() -> Result<(), Error> {
		let table = DropTable::get()?;
		assert!(table.bosses().count() > 5);

		let bosses: Vec<_> = table.bosses().collect();
		let mut sorted = bosses.clone();
		sorted.sort();
		assert_eq!(bosses, sorted);
		Ok(())
	}

	#[test]
	fn telos_has_both_pet_entries() -> Result<(), Error> {
		let telos = DropTable::get()?.lookup("Telos").unwrap();
		assert_eq!(
			telos.pet_hm,
			Some(PetRate {
				rate: 700,
				threshold: 300
			})
		);
		assert!(telos.pet.is_some());
		Ok(())
	}

	#[test]
	fn lookups_ignore_case() -> Result<(), Error> {
		let table = DropTable::get()?;
		assert_eq!(table.drop_rate("VORAGO", "Seismic Wand"), Some(20));
		assert_eq!(table.drop_rate("vorago", "rubber chicken"), None);
		assert_eq!(table.drop_rate("bob", "seismic wand"), None);
		assert_eq!(table.drop_rate("Telos", "Pet (HM)"), Some(700));
		Ok(())
	}

	#[test]
	fn lists_drops_pets_first() -> Result<(), Error> {
		let table = DropTable::get()?;
		let drops = table.drops(" RAKSHA").unwrap();
		assert_eq!(&drops[..2], ["pet", "pet (hm)"]);
		assert!(drops.contains(&"shadow spike"));
		assert_eq!(table.drops("bob"), None);
		Ok(())
	}

	#[test]
	fn missing_sections_default_to_empty() -> Result<(), Error> {
		let table = DropTable::from_json(br#"{ "Bob": { "drops": { "Cabbage": 3 } } }"#)?;
		let bob = table.lookup("bob").unwrap();

		assert!(bob.pet.is_none());
		assert!(bob.pet_hm.is_none());
		assert_eq!(bob.drop_names(), vec!["cabbage"]);
		Ok(())
	}
}
// }}}
