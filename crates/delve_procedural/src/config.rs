//! # Generation Configuration
//!
//! Fixed parameters for room generation, loaded once at startup.
//!
//! Every field has a default so a config file only needs to name what it
//! changes. The defaults reproduce the reference room: a 70x70 grid with
//! an irregular noise-shaped boundary, water and lava zones, and lava kept
//! ten cells away from water.

use serde::{Deserialize, Serialize};

use crate::error::{ProcgenError, ProcgenResult};
use crate::grid::CellType;

/// How the cells of a room are classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Noise-shaped region of ground, water and lava.
    #[default]
    Noise,
    /// Rectangular room with walls, floor, doors and windows.
    Bordered,
}

/// Boundary-shape noise parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    /// Scale applied to cell coordinates before sampling (lower = smoother).
    pub scale: f64,
    /// A cell is inside iff `distance + noise * 0.5 < threshold`.
    pub threshold: f64,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            scale: 0.2,
            threshold: 0.5,
        }
    }
}

/// One content noise field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSettings {
    /// Classification assigned where this field wins.
    pub cell_type: CellType,
    /// Minimum field value (0..1) for the field to win.
    pub threshold: f64,
    /// Coordinate offset in cells, so the two fields sample different areas.
    pub offset: f64,
}

/// Content noise parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// Scale applied to offset cell coordinates before sampling.
    pub scale: f64,
    /// Classification of inside cells where neither field wins.
    pub fallback: CellType,
    /// First field (water by default).
    pub field_a: FieldSettings,
    /// Second field (lava by default).
    pub field_b: FieldSettings,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            scale: 0.1,
            fallback: CellType::Ground,
            field_a: FieldSettings {
                cell_type: CellType::Water,
                threshold: 0.6,
                offset: 100.0,
            },
            field_b: FieldSettings {
                cell_type: CellType::Lava,
                threshold: 0.6,
                offset: 200.0,
            },
        }
    }
}

/// Minimum spacing between two classifications.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationSettings {
    /// Classification that is never altered.
    pub protected: CellType,
    /// Classification that yields when too close to `protected`.
    pub suppressed: CellType,
    /// What a yielding cell becomes.
    pub replacement: CellType,
    /// Cells closer than this (Euclidean, in cells) are too close.
    pub min_distance: u32,
}

impl Default for SeparationSettings {
    fn default() -> Self {
        Self {
            protected: CellType::Water,
            suppressed: CellType::Lava,
            replacement: CellType::Ground,
            min_distance: 10,
        }
    }
}

/// Parameters for [`LayoutMode::Bordered`] rooms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderedSettings {
    /// Place a window every N cells along the side walls (0 = no windows).
    pub window_spacing: usize,
}

/// Complete set of generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// World size of one cell.
    pub cell_size: f64,
    /// Classification strategy.
    pub layout: LayoutMode,
    /// Boundary shape (noise layout).
    pub shape: ShapeSettings,
    /// Content fields (noise layout).
    pub content: ContentSettings,
    /// Spacing rule (noise layout).
    pub separation: SeparationSettings,
    /// Walled room parameters (bordered layout).
    pub bordered: BorderedSettings,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 70,
            height: 70,
            cell_size: 1.0,
            layout: LayoutMode::Noise,
            shape: ShapeSettings::default(),
            content: ContentSettings::default(),
            separation: SeparationSettings::default(),
            bordered: BorderedSettings::default(),
        }
    }
}

impl GenerationConfig {
    /// Checks that the parameters can produce a room.
    ///
    /// # Errors
    ///
    /// Returns [`ProcgenError::InvalidDimensions`] for an empty grid and
    /// [`ProcgenError::InvalidConfig`] for non-finite or contradictory values.
    pub fn validate(&self) -> ProcgenResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ProcgenError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(invalid(format!("cell_size must be positive, got {}", self.cell_size)));
        }

        let numbers = [
            ("shape.scale", self.shape.scale),
            ("shape.threshold", self.shape.threshold),
            ("content.scale", self.content.scale),
            ("content.field_a.threshold", self.content.field_a.threshold),
            ("content.field_a.offset", self.content.field_a.offset),
            ("content.field_b.threshold", self.content.field_b.threshold),
            ("content.field_b.offset", self.content.field_b.offset),
        ];
        if let Some((name, value)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        let content = &self.content;
        if content.field_a.cell_type == content.field_b.cell_type {
            return Err(invalid(format!(
                "content fields must classify differently, both are {:?}",
                content.field_a.cell_type
            )));
        }
        if [content.fallback, content.field_a.cell_type, content.field_b.cell_type]
            .contains(&CellType::None)
        {
            return Err(invalid("content classifications cannot be None".to_string()));
        }

        let separation = &self.separation;
        if separation.protected == separation.suppressed {
            return Err(invalid(format!(
                "separation needs two classifications, both are {:?}",
                separation.protected
            )));
        }
        if separation.replacement == separation.suppressed {
            return Err(invalid(
                "separation replacement must differ from the suppressed type".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ProcgenError {
    ProcgenError::InvalidConfig(message)
}
