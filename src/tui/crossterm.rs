use crate::core::{KeyInput, KeyModifiers};

/// Host-level input the dashboard loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Key(KeyInput),
    Resize(u16, u16),
}

pub fn into_host_event(event: crossterm::event::Event) -> Option<HostEvent> {
    match event {
        crossterm::event::Event::Key(key) => into_key_input(key).map(HostEvent::Key),
        crossterm::event::Event::Resize(w, h) => Some(HostEvent::Resize(w, h)),
        _ => None,
    }
}

/// Converts a key press into the dashboard's key vocabulary. Releases and keys the dashboard
/// has no name for yield `None`.
pub fn into_key_input(event: crossterm::event::KeyEvent) -> Option<KeyInput> {
    if event.kind == crossterm::event::KeyEventKind::Release {
        return None;
    }
    let mut modifiers = into_key_modifiers(event.modifiers);
    let name = into_key_name(event.code, &mut modifiers)?;
    Some(KeyInput::new(name, modifiers))
}

fn into_key_modifiers(mods: crossterm::event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: mods.contains(crossterm::event::KeyModifiers::CONTROL),
        shift: mods.contains(crossterm::event::KeyModifiers::SHIFT),
        alt: mods.contains(crossterm::event::KeyModifiers::ALT),
    }
}

fn into_key_name(code: crossterm::event::KeyCode, modifiers: &mut KeyModifiers) -> Option<String> {
    let name = match code {
        crossterm::event::KeyCode::Char(' ') => "space".to_string(),
        crossterm::event::KeyCode::Char(ch) if ch.is_alphabetic() => {
            if ch.is_uppercase() {
                modifiers.shift = true;
            }
            ch.to_lowercase().collect()
        }
        crossterm::event::KeyCode::Char(ch) => {
            // symbols already carry their shift state (`?`, `!`)
            modifiers.shift = false;
            ch.to_string()
        }
        crossterm::event::KeyCode::Enter => "enter".to_string(),
        crossterm::event::KeyCode::Tab => "tab".to_string(),
        crossterm::event::KeyCode::BackTab => {
            modifiers.shift = true;
            "tab".to_string()
        }
        crossterm::event::KeyCode::Esc => "escape".to_string(),
        crossterm::event::KeyCode::Backspace => "backspace".to_string(),
        crossterm::event::KeyCode::Delete => "delete".to_string(),
        crossterm::event::KeyCode::Up => "up".to_string(),
        crossterm::event::KeyCode::Down => "down".to_string(),
        crossterm::event::KeyCode::Left => "left".to_string(),
        crossterm::event::KeyCode::Right => "right".to_string(),
        crossterm::event::KeyCode::Home => "home".to_string(),
        crossterm::event::KeyCode::End => "end".to_string(),
        crossterm::event::KeyCode::PageUp => "pageup".to_string(),
        crossterm::event::KeyCode::PageDown => "pagedown".to_string(),
        crossterm::event::KeyCode::F(n) => format!("f{n}"),
        crossterm::event::KeyCode::Null => {
            modifiers.ctrl = true;
            "space".to_string()
        }
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
#[path = "../../tests/unit/tui/crossterm.rs"]
mod tests;
