//! # Session Configuration
//!
//! Parses `delve.toml`: generation parameters, navigation limits and the
//! piece catalog. Every section is optional.
//!
//! ```toml
//! [generation]
//! width = 40
//! layout = "bordered"
//!
//! [navigation]
//! max_rooms = 8
//! session_seed = 1234
//!
//! [[pieces]]
//! asset = "floor_tile"
//! cell_type = "floor"
//! weight = 4.0
//! ```

use std::path::Path;

use delve_procedural::{GenerationConfig, Piece, PieceCatalog};
use serde::{Deserialize, Serialize};

use crate::error::{DelveError, DelveResult};

/// Room chain limits and session randomness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Number of rooms in the chain. Going forward from the last one
    /// reports the limit instead of generating.
    pub max_rooms: usize,
    /// Seed for the session RNG that draws room seeds. `None` seeds from
    /// the wall clock.
    pub session_seed: Option<u64>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_rooms: 5,
            session_seed: None,
        }
    }
}

/// Top-level session configuration, parsed from `delve.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelveConfig {
    /// Room generation parameters.
    pub generation: GenerationConfig,
    /// Chain limits.
    pub navigation: NavigationConfig,
    /// Piece descriptors, in catalog order.
    pub pieces: Vec<Piece>,
}

impl Default for DelveConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            navigation: NavigationConfig::default(),
            pieces: PieceCatalog::standard_pieces(),
        }
    }
}

impl DelveConfig {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`DelveError::ConfigParse`] for malformed TOML and the
    /// validation error for unusable values.
    pub fn from_toml_str(text: &str) -> DelveResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DelveError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DelveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), pieces = config.pieces.len(), "configuration loaded");
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns [`DelveError::InvalidConfig`] for a zero room limit and the
    /// generation or piece validation error otherwise.
    pub fn validate(&self) -> DelveResult<()> {
        if self.navigation.max_rooms == 0 {
            return Err(DelveError::InvalidConfig(
                "navigation.max_rooms must be at least 1".to_string(),
            ));
        }
        self.generation.validate()?;
        for piece in &self.pieces {
            piece.validate()?;
        }
        Ok(())
    }

    /// Builds the piece catalog.
    ///
    /// Classifications with no pieces are left as configuration gaps; the
    /// builder logs and skips their cells.
    ///
    /// # Errors
    ///
    /// Returns the first invalid piece.
    pub fn catalog(&self) -> DelveResult<PieceCatalog> {
        Ok(PieceCatalog::from_pieces(self.pieces.iter().cloned())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_procedural::{CellType, LayoutMode, ProcgenError};

    #[test]
    fn test_defaults() {
        let config = DelveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.navigation.max_rooms, 5);
        assert_eq!(config.navigation.session_seed, None);

        let catalog = config.catalog().unwrap();
        for cell_type in CellType::ALL {
            assert_eq!(catalog.covers(cell_type), cell_type != CellType::None);
        }
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(DelveConfig::from_toml_str("").unwrap(), DelveConfig::default());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = DelveConfig::from_toml_str(
            r#"
            [generation]
            width = 24
            height = 18
            layout = "bordered"

            [generation.bordered]
            window_spacing = 4

            [navigation]
            max_rooms = 3
            session_seed = 99

            [[pieces]]
            asset = "stone"
            cell_type = "floor"
            footprint = [2, 2]
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.width, 24);
        assert_eq!(config.generation.layout, LayoutMode::Bordered);
        assert_eq!(config.generation.bordered.window_spacing, 4);
        assert_eq!(config.navigation.max_rooms, 3);
        assert_eq!(config.navigation.session_seed, Some(99));
        assert_eq!(config.pieces.len(), 1);

        let catalog = config.catalog().unwrap();
        assert!(catalog.covers(CellType::Floor));
        assert!(!catalog.covers(CellType::Wall), "an explicit list replaces the defaults");
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = DelveConfig::from_toml_str("[navigation]\nmax_rooms = 0\n").unwrap_err();
        assert!(matches!(err, DelveError::InvalidConfig(_)));

        let err = DelveConfig::from_toml_str("[generation]\nwidth = 0\n").unwrap_err();
        assert!(matches!(
            err,
            DelveError::Procgen(ProcgenError::InvalidDimensions { .. })
        ));

        let err = DelveConfig::from_toml_str(
            "[[pieces]]\nasset = \"bad\"\ncell_type = \"wall\"\nweight = -1.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, DelveError::Procgen(ProcgenError::InvalidPiece { .. })));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = DelveConfig::from_toml_str("[navigation\nmax_rooms = 1").unwrap_err();
        assert!(matches!(err, DelveError::ConfigParse(_)));
    }

    #[test]
    fn test_sample_file_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/delve.toml");
        let config = DelveConfig::from_file(path).unwrap();
        assert_eq!(config.generation.width, 48);
        assert_eq!(config.generation.separation.min_distance, 6);
        assert_eq!(config.pieces.len(), 9);
        assert!(config.catalog().unwrap().covers(CellType::Window));
    }

    #[test]
    fn test_missing_file() {
        let err = DelveConfig::from_file("/definitely/not/here/delve.toml").unwrap_err();
        assert!(matches!(err, DelveError::Io { .. }));
    }
}
