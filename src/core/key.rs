//! Raw key input and its canonical combination string.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            shift: false,
            alt: false,
        }
    }

    pub const fn shift() -> Self {
        Self {
            ctrl: false,
            shift: true,
            alt: false,
        }
    }

    pub const fn alt() -> Self {
        Self {
            ctrl: false,
            shift: false,
            alt: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.shift && !self.alt
    }
}

/// A key as delivered by the host: base name plus modifier flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeyInput {
    pub name: String,
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    pub fn new(name: impl Into<String>, modifiers: KeyModifiers) -> Self {
        Self {
            name: name.into(),
            modifiers,
        }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, KeyModifiers::NONE)
    }

    pub fn ctrl(name: impl Into<String>) -> Self {
        Self::new(name, KeyModifiers::ctrl())
    }

    pub fn shift(name: impl Into<String>) -> Self {
        Self::new(name, KeyModifiers::shift())
    }

    pub fn combo(&self) -> String {
        parse_key(&self.name, self.modifiers)
    }
}

/// Builds the canonical combination string: `C-` then `S-` then `M-`, followed by the base name.
///
/// The base name is kept verbatim, so the mapping is total and deterministic for every input.
pub fn parse_key(name: &str, modifiers: KeyModifiers) -> String {
    let mut combo = String::with_capacity(name.len() + 6);
    if modifiers.ctrl {
        combo.push_str("C-");
    }
    if modifiers.shift {
        combo.push_str("S-");
    }
    if modifiers.alt {
        combo.push_str("M-");
    }
    combo.push_str(name);
    combo
}

#[cfg(test)]
#[path = "../../tests/unit/core/key.rs"]
mod tests;
