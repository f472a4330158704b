use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    Error,
    fixture::{self, Fixture},
    loader::DuplicatePolicy,
};

pub const DEFAULT_DATABASE: &str = "sqlite://export-registry.db";

/// Loader settings, read from YAML:
///
/// ```yaml
/// database: sqlite://catalog.db
/// fixtures:
///   - fixtures/export.json
/// on_duplicate: reject
/// ```
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub database: Option<String>,
    #[serde(default)]
    pub fixtures: Vec<PathBuf>,
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.database().starts_with("sqlite:") {
            return Err(format!(
                "database must be a sqlite URL, got {}",
                self.database()
            ));
        }
        Ok(())
    }

    /// Resolve relative fixture paths against the directory of the config file.
    pub fn relative_to(mut self, base: &Path) -> Self {
        for path in &mut self.fixtures {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Read and validate the configured fixtures, or the bundled one if none
    /// are configured.
    pub async fn read_fixtures(&self) -> Result<Vec<Fixture>, Error> {
        if self.fixtures.is_empty() {
            return Ok(vec![fixture::bundled()?]);
        }
        let mut fixtures = Vec::with_capacity(self.fixtures.len());
        for path in &self.fixtures {
            fixtures.push(Fixture::read(path).await?);
        }
        Ok(fixtures)
    }
}
