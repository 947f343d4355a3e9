#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
	/// Id used by the profile api.
	pub id: u32,
	pub name: &'static str,
	pub aliases: &'static [&'static str],
}

macro_rules! skills {
	($($id:literal => $name:literal [$($alias:literal),*]),* $(,)?) => {
		pub const SKILLS: &[Skill] = &[
			$(Skill { id: $id, name: $name, aliases: &[$($alias),*] }),*
		];
	};
}

skills! {
	0 => "attack" ["att", "atk"],
	1 => "defence" ["def", "defense"],
	2 => "strength" ["str"],
	3 => "constitution" ["hp", "cons", "hitpoints"],
	4 => "ranged" ["range", "ranging"],
	5 => "prayer" ["pray"],
	6 => "magic" ["mage"],
	7 => "cooking" ["cook"],
	8 => "woodcutting" ["wc"],
	9 => "fletching" ["fletch"],
	10 => "fishing" ["fish"],
	11 => "firemaking" ["fm"],
	12 => "crafting" ["craft"],
	13 => "smithing" ["smith"],
	14 => "mining" ["mine"],
	15 => "herblore" ["herb"],
	16 => "agility" ["agil", "agi"],
	17 => "thieving" ["thief", "thieve"],
	18 => "slayer" ["slay"],
	19 => "farming" ["farm"],
	20 => "runecrafting" ["rc", "runecraft"],
	21 => "hunter" ["hunt"],
	22 => "construction" ["con"],
	23 => "summoning" ["summ", "summon"],
	24 => "dungeoneering" ["dg", "dung"],
	25 => "divination" ["div"],
	26 => "invention" ["inv", "invent"],
	27 => "archaeology" ["arch", "arc"],
	28 => "necromancy" ["necro"],
}

impl Skill {
	pub fn by_id(id: u32) -> Option<&'static Skill> {
		SKILLS.iter().find(|skill| skill.id == id)
	}

	/// Looks a skill up by its name or any of its aliases, ignoring case.
	pub fn by_alias(alias: &str) -> Option<&'static Skill> {
		let alias = alias.trim().to_lowercase();
		SKILLS
			.iter()
			.find(|skill| skill.name == alias || skill.aliases.iter().any(|a| *a == alias))
	}

	/// The name, capitalized.
	pub fn title(&self) -> String {
		let mut chars = self.name.chars();
		match chars.next() {
			Some(first) => first.to_uppercase().chain(chars).collect(),
			None => String::new(),
		}
	}
}

/// Formats xp reported in tenths, like `1234567` into `123456.7`.
pub fn format_xp(tenths: u64) -> String {
	format!("{}.{}", tenths / 10, tenths % 10)
}
