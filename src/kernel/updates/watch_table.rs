//! Path pattern → target panes. Rules are tried in declared order; the first match wins.

use super::event::{path_key, WatchTargets};
use crate::kernel::panes::{PaneId, PaneKind};
use regex::Regex;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct WatchRule {
    pattern: Regex,
    targets: WatchTargets,
}

impl WatchRule {
    pub fn new(pattern: &str, targets: WatchTargets) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            targets,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn targets(&self) -> &WatchTargets {
        &self.targets
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

#[derive(Debug, Clone)]
pub struct WatchTable {
    rules: Vec<WatchRule>,
}

impl WatchTable {
    pub fn new(rules: Vec<WatchRule>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        let kinds = |kind: PaneKind| WatchTargets::Panes(vec![PaneId::from(kind)]);
        let table = [
            (r"current[-_]phase", kinds(PaneKind::Progress)),
            (r"(tickets|tasks)/", kinds(PaneKind::Tasks)),
            (r"capabilit|gap[-_]analysis", kinds(PaneKind::Capabilities)),
            (r"metrics", kinds(PaneKind::Metrics)),
            (r"\.log$", kinds(PaneKind::Logs)),
            (r"events?[-_./]", kinds(PaneKind::Events)),
            (r"(config|settings)\.(json|toml|ya?ml)$", WatchTargets::All),
        ];
        let rules = table
            .into_iter()
            .filter_map(|(pattern, targets)| match WatchRule::new(pattern, targets) {
                Ok(rule) => Some(rule),
                Err(error) => {
                    tracing::error!(pattern, %error, "invalid watch pattern");
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// Targets of the first matching rule; unmatched paths fan out to every pane.
    pub fn resolve(&self, path: &Path) -> WatchTargets {
        let key = path_key(path);
        self.rules
            .iter()
            .find(|rule| rule.is_match(&key))
            .map(|rule| rule.targets.clone())
            .unwrap_or(WatchTargets::All)
    }

    pub fn rules(&self) -> &[WatchRule] {
        &self.rules
    }
}

impl Default for WatchTable {
    fn default() -> Self {
        Self::builtin()
    }
}
