//! Preset catalog: named pane arrangements with a minimum terminal size.
//!
//! Catalog order is the downgrade chain, largest preset first.

use super::geom::TerminalDimensions;
use crate::core::{DashboardError, Result};
use crate::kernel::panes::{PaneId, PaneKind};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutShape {
    Single,
    Triple,
    Quad,
    Full,
}

impl LayoutShape {
    pub fn slot_count(&self) -> usize {
        match self {
            LayoutShape::Single => 1,
            LayoutShape::Triple => 3,
            LayoutShape::Quad => 4,
            LayoutShape::Full => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutShape::Single => "single",
            LayoutShape::Triple => "triple",
            LayoutShape::Quad => "quad",
            LayoutShape::Full => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub shape: LayoutShape,
    pub panes: Vec<PaneId>,
    pub min_width: u16,
    pub min_height: u16,
}

impl Preset {
    pub fn new(
        id: &str,
        shape: LayoutShape,
        panes: &[PaneKind],
        min_width: u16,
        min_height: u16,
    ) -> Self {
        Self {
            id: id.to_string(),
            shape,
            panes: panes.iter().copied().map(PaneId::from).collect(),
            min_width,
            min_height,
        }
    }

    pub fn fits(&self, dims: TerminalDimensions) -> bool {
        dims.width >= self.min_width && dims.height >= self.min_height
    }

    pub fn contains(&self, pane: &PaneId) -> bool {
        self.panes.contains(pane)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    pub fn new(presets: Vec<Preset>) -> Result<Self> {
        if presets.is_empty() {
            return Err(DashboardError::InvalidPreset("empty catalog".to_string()));
        }
        let mut seen = FxHashSet::default();
        for preset in &presets {
            if !seen.insert(preset.id.as_str()) {
                return Err(DashboardError::InvalidPreset(format!(
                    "{} is declared twice",
                    preset.id
                )));
            }
            if preset.panes.len() != preset.shape.slot_count() {
                return Err(DashboardError::InvalidPreset(format!(
                    "{}: {} layout needs {} panes, got {}",
                    preset.id,
                    preset.shape.as_str(),
                    preset.shape.slot_count(),
                    preset.panes.len()
                )));
            }
            let unique: FxHashSet<&PaneId> = preset.panes.iter().collect();
            if unique.len() != preset.panes.len() {
                return Err(DashboardError::InvalidPreset(format!(
                    "{}: pane listed twice",
                    preset.id
                )));
            }
        }
        Ok(Self { presets })
    }

    pub fn builtin() -> Self {
        use PaneKind::*;
        Self {
            presets: vec![
                Preset::new(
                    "full",
                    LayoutShape::Full,
                    &[Progress, Tasks, Capabilities, Metrics, Logs],
                    160,
                    45,
                ),
                Preset::new(
                    "debug",
                    LayoutShape::Quad,
                    &[Logs, Events, Metrics, Progress],
                    120,
                    36,
                ),
                Preset::new(
                    "monitoring",
                    LayoutShape::Quad,
                    &[Progress, Tasks, Metrics, Logs],
                    100,
                    30,
                ),
                Preset::new(
                    "development",
                    LayoutShape::Triple,
                    &[Progress, Tasks, Capabilities],
                    80,
                    24,
                ),
                Preset::new("quick", LayoutShape::Single, &[Progress], 40, 12),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// The smallest preset, used when nothing fits.
    pub fn smallest(&self) -> &Preset {
        &self.presets[self.presets.len() - 1]
    }

    /// Walks the chain from `id` toward smaller presets and returns the first that fits `dims`,
    /// or the smallest preset when none does.
    pub fn resolve_fitting(&self, id: &str, dims: TerminalDimensions) -> Option<&Preset> {
        let start = self.position(id)?;
        Some(
            self.presets[start..]
                .iter()
                .find(|preset| preset.fits(dims))
                .unwrap_or_else(|| self.smallest()),
        )
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
