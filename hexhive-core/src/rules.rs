//! Rules - configurable game variant

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::pieces::Expansions;

/// Variant switches. Unknown or missing JSON fields fall back to the
/// standard variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub name: String,
    pub expansions: Expansions,
    /// A color's own turn number by which the queen must be on the board.
    /// On that turn only the queen may be placed.
    pub queen_deadline: Option<u32>,
    /// Queen may not be placed on a color's first turn
    pub forbid_opening_queen: bool,
    /// Board pieces cannot move until their color's queen is placed
    pub movement_requires_queen: bool,
    /// A player may not move or throw the piece they moved on their own
    /// previous turn
    pub freeze_last_moved: bool,
}

impl Rules {
    /// Standard variant: queen by the fourth turn, no expansions
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            expansions: Expansions::none(),
            queen_deadline: Some(4),
            forbid_opening_queen: false,
            movement_requires_queen: true,
            freeze_last_moved: true,
        }
    }

    /// Tournament variant: all expansions, no queen on the opening turn
    pub fn tournament() -> Self {
        Self {
            name: "tournament".to_string(),
            expansions: Expansions::all(),
            forbid_opening_queen: true,
            ..Self::standard()
        }
    }

    /// Relaxed house rules: no deadline and no freeze
    pub fn casual() -> Self {
        Self {
            name: "casual".to_string(),
            queen_deadline: None,
            freeze_last_moved: false,
            ..Self::standard()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "tournament" => Some(Self::tournament()),
            "casual" => Some(Self::casual()),
            _ => None,
        }
    }

    /// Load from a JSON file, or a preset name
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            if let Some(preset) = path.to_str().and_then(Self::preset) {
                return Ok(preset);
            }
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules: {}", path.display()))?;
        let rules = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse rules: {}", path.display()))?;
        Ok(rules)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}
