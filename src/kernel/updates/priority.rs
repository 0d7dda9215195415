use super::event::{path_key, Priority};
use regex::Regex;
use std::path::Path;

/// Ordered priority rules; the first matching pattern decides, anything else is `Low`.
#[derive(Debug, Clone)]
pub struct PriorityRules {
    rules: Vec<(Regex, Priority)>,
}

impl PriorityRules {
    pub fn new(rules: Vec<(Regex, Priority)>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        let table = [
            (r"current[-_]phase", Priority::High),
            (r"phase[-_]transition", Priority::High),
            (r"\.lock$", Priority::High),
            (r"capabilit", Priority::Medium),
            (r"gap[-_]analysis", Priority::Medium),
            (r"config", Priority::Medium),
            (r"settings", Priority::Medium),
        ];
        let mut rules = Vec::with_capacity(table.len());
        for (pattern, priority) in table {
            match Regex::new(pattern) {
                Ok(regex) => rules.push((regex, priority)),
                Err(error) => tracing::error!(pattern, %error, "invalid priority pattern"),
            }
        }
        Self { rules }
    }

    pub fn classify(&self, path: &Path) -> Priority {
        let key = path_key(path);
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(&key))
            .map(|(_, priority)| *priority)
            .unwrap_or(Priority::Low)
    }
}

impl Default for PriorityRules {
    fn default() -> Self {
        Self::builtin()
    }
}
