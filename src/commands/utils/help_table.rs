use std::fmt::Write as _;

/// Usage lines with their descriptions aligned in a second column.
#[derive(Debug, Default)]
pub struct HelpTable {
	title: String,
	rows: Vec<(String, String)>,
}

impl HelpTable {
	pub fn new(title: &str) -> Self {
		Self {
			title: title.to_owned(),
			rows: Vec::new(),
		}
	}

	pub fn row(mut self, usage: &str, description: &str) -> Self {
		self.rows.push((usage.to_owned(), description.to_owned()));
		self
	}

	/// Renders the table inside a code block, so the columns line up.
	pub fn render(&self) -> String {
		let width = self
			.rows
			.iter()
			.map(|(usage, _)| usage.chars().count())
			.max()
			.unwrap_or(0);

		let mut text = format!("```{}\n\n", self.title);
		for (usage, description) in &self.rows {
			let padding = width - usage.chars().count();
			// Writing to a string can't fail
			let _ = writeln!(text, "  {usage}{} - {description}", " ".repeat(padding));
		}

		text.truncate(text.trim_end().len());
		text.push_str("```");
		text
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn aligns_descriptions() {
		let text = HelpTable::new("Demo")
			.row("$a", "first")
			.row("$abc <x>", "second")
			.render();

		assert_eq!(
			text,
			"```Demo\n\n  $a       - first\n  $abc <x> - second```"
		);
	}
}
