use na_map_shared::models::{slugify, Port, Ship};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub struct Assets {
    pub ports: Vec<Port>,
    pub ships: Vec<Ship>,
}

fn load_json<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T, AssetError> {
    let data = std::fs::read_to_string(&path).map_err(|source| AssetError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| AssetError::Parse { path, source })
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self, AssetError> {
        let ports: Vec<Port> = load_json(assets_dir.join("ports.json"))?;
        let ships: Vec<Ship> = load_json(assets_dir.join("ships.json"))?;

        tracing::info!(ports = ports.len(), ships = ships.len(), "Loaded game data");

        Ok(Assets { ports, ships })
    }

    /// Port names are matched case-insensitively, as typed into the position finder.
    pub fn find_port(&self, name: &str) -> Option<&Port> {
        let name = name.trim();
        self.ports
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Ships are looked up by name or slug, ignoring case.
    pub fn find_ship(&self, name: &str) -> Option<&Ship> {
        let slug = slugify(name);
        self.ships
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()) || s.slug() == slug)
    }
}
