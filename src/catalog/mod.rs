//! Read-only access to the learning-game catalog shown next to the trackers.

use std::{collections::HashMap, fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{FinanceError, FinanceResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCatalog {
    #[serde(default)]
    pub games: Vec<Value>,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub completed_games: u32,
}

impl GameCatalog {
    /// Display titles of the listed games, skipping entries without one.
    pub fn titles(&self) -> Vec<&str> {
        self.games
            .iter()
            .filter_map(|game| {
                game.get("title")
                    .or_else(|| game.get("name"))
                    .and_then(Value::as_str)
            })
            .collect()
    }

    pub fn completion_percentage(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        f64::from(self.completed_games.min(self.total_games)) / f64::from(self.total_games) * 100.0
    }
}

pub trait GameCatalogSource {
    fn fetch(&self, name: &str) -> FinanceResult<GameCatalog>;
}

/// Catalog source backed by fixed, in-process responses.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    catalogs: HashMap<String, GameCatalog>,
}

impl StaticCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, name: impl Into<String>, catalog: GameCatalog) -> Self {
        self.catalogs.insert(name.into(), catalog);
        self
    }

    /// Parses a `{games, totalGames, completedGames}` response body.
    pub fn with_json(self, name: impl Into<String>, body: &str) -> FinanceResult<Self> {
        let catalog: GameCatalog = serde_json::from_str(body)?;
        Ok(self.with_catalog(name, catalog))
    }
}

impl GameCatalogSource for StaticCatalogSource {
    fn fetch(&self, name: &str) -> FinanceResult<GameCatalog> {
        self.catalogs
            .get(name)
            .cloned()
            .ok_or_else(|| FinanceError::ExternalCall(format!("game catalog `{name}` unavailable")))
    }
}

/// Reads catalog responses saved as `<name>.json` under one directory.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    root: PathBuf,
}

impl FileCatalogSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl GameCatalogSource for FileCatalogSource {
    fn fetch(&self, name: &str) -> FinanceResult<GameCatalog> {
        let path = self.root.join(format!("{name}.json"));
        let body = fs::read_to_string(&path).map_err(|err| {
            FinanceError::ExternalCall(format!("game catalog `{name}` unavailable: {err}"))
        })?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Falls back to an empty catalog when the source cannot be reached.
pub fn load_catalog_or_default(source: &dyn GameCatalogSource, name: &str) -> GameCatalog {
    match source.fetch(name) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::warn!(catalog = name, error = %err, "using empty game catalog");
            GameCatalog::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_response_body() {
        let source = StaticCatalogSource::new()
            .with_json(
                "credit",
                r#"{"games":[{"id":1}],"totalGames":4,"completedGames":1}"#,
            )
            .unwrap();
        let catalog = load_catalog_or_default(&source, "credit");
        assert_eq!(catalog.games.len(), 1);
        assert_eq!(catalog.completion_percentage(), 25.0);
    }

    #[test]
    fn file_source_reads_saved_catalog() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("debt.json"),
            r#"{"games":[{"title":"Snowball Sprint"},{"id":7}],"totalGames":2,"completedGames":2}"#,
        )
        .unwrap();
        let source = FileCatalogSource::new(dir.path().to_path_buf());
        let catalog = load_catalog_or_default(&source, "debt");
        assert_eq!(catalog.titles(), vec!["Snowball Sprint"]);
        assert_eq!(catalog.completion_percentage(), 100.0);

        assert!(matches!(
            source.fetch("credit"),
            Err(FinanceError::ExternalCall(_))
        ));
        assert_eq!(load_catalog_or_default(&source, "credit"), GameCatalog::default());
    }

    #[test]
    fn unreachable_source_yields_empty_catalog() {
        let catalog = load_catalog_or_default(&StaticCatalogSource::new(), "debt");
        assert_eq!(catalog, GameCatalog::default());
        assert_eq!(catalog.completion_percentage(), 0.0);
    }
}
