use super::geom::{Rect, TerminalDimensions};
use super::preset::{LayoutShape, Preset, PresetCatalog};
use crate::core::{DashboardError, Result};
use crate::kernel::panes::PaneId;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneRegion {
    pub pane: PaneId,
    pub rect: Rect,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub preset: String,
    pub shape: LayoutShape,
    pub dimensions: TerminalDimensions,
    pub panes: Vec<PaneRegion>,
}

impl Layout {
    pub fn focused(&self) -> Option<&PaneRegion> {
        self.panes.iter().find(|region| region.focused)
    }

    pub fn region(&self, pane: &PaneId) -> Option<&PaneRegion> {
        self.panes.iter().find(|region| &region.pane == pane)
    }
}

/// Result of a preset switch. `downgraded` is the caller-visible warning that the requested
/// preset did not fit and a smaller one was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetChange {
    pub requested: String,
    pub applied: String,
    pub downgraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSummary {
    pub id: String,
    pub shape: LayoutShape,
    pub pane_count: usize,
    pub min_width: u16,
    pub min_height: u16,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LayoutKey {
    preset: String,
    width: u16,
    height: u16,
}

pub struct LayoutEngine {
    catalog: PresetCatalog,
    dimensions: TerminalDimensions,
    active: usize,
    focused: Option<PaneId>,
    cache: FxHashMap<LayoutKey, Arc<Layout>>,
}

impl LayoutEngine {
    /// Starts on the largest preset that fits `dimensions`.
    pub fn new(catalog: PresetCatalog, dimensions: TerminalDimensions) -> Self {
        let active = catalog
            .iter()
            .position(|preset| preset.fits(dimensions))
            .unwrap_or(catalog.len() - 1);
        let focused = catalog
            .iter()
            .nth(active)
            .and_then(|preset| preset.panes.first().cloned());
        Self {
            catalog,
            dimensions,
            active,
            focused,
            cache: FxHashMap::default(),
        }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn dimensions(&self) -> TerminalDimensions {
        self.dimensions
    }

    pub fn active_preset(&self) -> &Preset {
        self.catalog
            .iter()
            .nth(self.active)
            .unwrap_or_else(|| self.catalog.smallest())
    }

    pub fn focused_pane(&self) -> Option<&PaneId> {
        self.focused.as_ref()
    }

    pub fn set_preset(&mut self, name: &str) -> Result<PresetChange> {
        let name = name.trim();
        let applied = self
            .catalog
            .resolve_fitting(name, self.dimensions)
            .ok_or_else(|| DashboardError::InvalidPreset(name.to_string()))?;
        let applied_id = applied.id.clone();
        let downgraded = applied_id != name;
        if downgraded {
            tracing::warn!(
                requested = name,
                applied = %applied_id,
                width = self.dimensions.width,
                height = self.dimensions.height,
                "preset does not fit terminal, downgraded"
            );
        }

        let keep_focus = self
            .focused
            .as_ref()
            .is_some_and(|focused| applied.contains(focused));
        if !keep_focus {
            self.focused = applied.panes.first().cloned();
        }
        self.active = self.catalog.position(&applied_id).unwrap_or(self.active);
        self.cache.clear();

        tracing::debug!(preset = %applied_id, "preset applied");
        Ok(PresetChange {
            requested: name.to_string(),
            applied: applied_id,
            downgraded,
        })
    }

    pub fn update_dimensions(&mut self, width: u16, height: u16) {
        self.dimensions = TerminalDimensions::new(width, height);
        self.cache.clear();
    }

    pub fn compute_layout(&mut self) -> Arc<Layout> {
        let preset = self.active_preset();
        let key = LayoutKey {
            preset: preset.id.clone(),
            width: self.dimensions.width,
            height: self.dimensions.height,
        };
        if let Some(hit) = self.cache.get(&key) {
            return Arc::clone(hit);
        }

        let layout = Arc::new(Layout {
            preset: preset.id.clone(),
            shape: preset.shape,
            dimensions: self.dimensions,
            panes: compute_regions(
                preset.shape,
                &preset.panes,
                self.dimensions.area(),
                self.focused.as_ref(),
            ),
        });
        self.cache.insert(key, Arc::clone(&layout));
        layout
    }

    pub fn focus_pane(&mut self, pane: &PaneId) -> bool {
        if !self.active_preset().contains(pane) {
            return false;
        }
        self.set_focus(pane.clone());
        true
    }

    pub fn next_pane(&mut self) -> Option<PaneId> {
        self.cycle(1)
    }

    pub fn previous_pane(&mut self) -> Option<PaneId> {
        self.cycle(-1)
    }

    pub fn list_available_presets(&self) -> Vec<PresetSummary> {
        let active_id = self.active_preset().id.as_str();
        self.catalog
            .iter()
            .filter(|preset| preset.fits(self.dimensions))
            .map(|preset| PresetSummary {
                id: preset.id.clone(),
                shape: preset.shape,
                pane_count: preset.panes.len(),
                min_width: preset.min_width,
                min_height: preset.min_height,
                active: preset.id == active_id,
            })
            .collect()
    }

    fn cycle(&mut self, step: isize) -> Option<PaneId> {
        let panes = &self.active_preset().panes;
        if panes.is_empty() {
            return None;
        }
        let len = panes.len() as isize;
        let next = match self
            .focused
            .as_ref()
            .and_then(|focused| panes.iter().position(|p| p == focused))
        {
            Some(idx) => (idx as isize + step).rem_euclid(len) as usize,
            None => 0,
        };
        let pane = panes[next].clone();
        self.set_focus(pane.clone());
        Some(pane)
    }

    fn set_focus(&mut self, pane: PaneId) {
        if self.focused.as_ref() != Some(&pane) {
            self.focused = Some(pane);
            // focus is part of every cached layout
            self.cache.clear();
        }
    }
}

/// Divides `area` among `panes` according to `shape`. Regions with no area are dropped.
pub fn compute_regions(
    shape: LayoutShape,
    panes: &[PaneId],
    area: Rect,
    focused: Option<&PaneId>,
) -> Vec<PaneRegion> {
    let rects = match shape {
        LayoutShape::Single => vec![area],
        LayoutShape::Triple => {
            let (left, right) = area.split_columns(1, 2);
            let (top, bottom) = right.split_rows(1, 2);
            vec![left, top, bottom]
        }
        LayoutShape::Quad => {
            let (top, bottom) = area.split_rows(1, 2);
            let (top_left, top_right) = top.split_columns(1, 2);
            let (bottom_left, bottom_right) = bottom.split_columns(1, 2);
            vec![top_left, top_right, bottom_left, bottom_right]
        }
        LayoutShape::Full => {
            let (primary, sidebar) = area.split_columns(2, 3);
            let (main, secondary) = primary.split_rows(3, 5);
            let mut rects = vec![main, secondary];
            rects.extend(sidebar.stack(3));
            rects
        }
    };

    panes
        .iter()
        .zip(rects)
        .filter(|(_, rect)| !rect.is_empty())
        .map(|(pane, rect)| PaneRegion {
            pane: pane.clone(),
            rect,
            focused: focused == Some(pane),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/layout/engine.rs"]
mod tests;
