//! This module provides helpers for working with environment
//! variables and paths, together with a struct
//! that keeps track of all the runtime-relevant paths.

use anyhow::Context;
use std::{path::PathBuf, str::FromStr};

/// Wrapper around [std::env::var] which adds [anyhow] context around errors.
pub fn get_var(name: &str) -> anyhow::Result<String> {
	std::env::var(name).with_context(|| format!("Missing ${name} environment variable"))
}

/// Reads an environment variable containing a directory path,
/// creating the directory if it doesn't exist.
pub fn get_env_dir_path(name: &str, default_to: Option<&str>) -> anyhow::Result<PathBuf> {
	let var = get_var(name);
	let var = match default_to {
		None => var?,
		Some(other) => var.or(get_var(other))?,
	};

	let path = PathBuf::from_str(&var).with_context(|| format!("${name} is not a valid path"))?;
	ensure_dir(&path).with_context(|| format!("Could not create ${name}"))?;

	Ok(path)
}

fn ensure_dir(path: &PathBuf) -> std::io::Result<()> {
	if !path.exists() {
		std::fs::create_dir_all(path)?;
	}

	Ok(())
}

#[derive(Clone, Debug)]
pub struct MathbotPaths {
	/// This directory contains files that are entirely managed
	/// by the runtime of the app, like the database.
	data_dir: PathBuf,

	/// This directory contains logs and other debugging info.
	log_dir: PathBuf,
}

impl MathbotPaths {
	/// Gets all the standard paths from the environment,
	/// creating every involved directory in the process.
	pub fn new() -> anyhow::Result<Self> {
		let res = Self {
			data_dir: get_env_dir_path("MATHBOT_DATA_DIR", Some("STATE_DIRECTORY"))?,
			log_dir: get_env_dir_path("MATHBOT_LOG_DIR", Some("LOGS_DIRECTORY"))?,
		};

		Ok(res)
	}

	/// Builds the paths from explicit directories, creating them if needed.
	pub fn from_dirs(data_dir: PathBuf, log_dir: PathBuf) -> anyhow::Result<Self> {
		ensure_dir(&data_dir).with_context(|| format!("Could not create `{data_dir:?}`"))?;
		ensure_dir(&log_dir).with_context(|| format!("Could not create `{log_dir:?}`"))?;
		Ok(Self { data_dir, log_dir })
	}

	pub fn data_dir(&self) -> &PathBuf {
		&self.data_dir
	}

	pub fn log_dir(&self) -> &PathBuf {
		&self.log_dir
	}

	pub fn db_path(&self) -> PathBuf {
		self.data_dir.join("db.sqlite")
	}

	pub fn log_file_name(&self) -> &'static str {
		"mathbot.log"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_dirs_creates_missing_directories() -> anyhow::Result<()> {
		let dir = tempfile::tempdir()?;
		let paths = MathbotPaths::from_dirs(dir.path().join("a/b"), dir.path().join("logs"))?;

		assert!(paths.data_dir().exists());
		assert!(paths.log_dir().exists());
		assert_eq!(paths.db_path(), dir.path().join("a/b/db.sqlite"));
		Ok(())
	}
}
