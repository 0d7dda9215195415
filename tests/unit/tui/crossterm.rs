use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers as CtKeyModifiers};

fn press(code: KeyCode, modifiers: CtKeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn combo(code: KeyCode, modifiers: CtKeyModifiers) -> Option<String> {
    into_key_input(press(code, modifiers)).map(|key| key.combo())
}

#[test]
fn plain_and_control_chars() {
    assert_eq!(combo(KeyCode::Char('q'), CtKeyModifiers::NONE).as_deref(), Some("q"));
    assert_eq!(
        combo(KeyCode::Char('c'), CtKeyModifiers::CONTROL).as_deref(),
        Some("C-c")
    );
}

#[test]
fn uppercase_becomes_shift_lowercase() {
    assert_eq!(
        combo(KeyCode::Char('G'), CtKeyModifiers::SHIFT).as_deref(),
        Some("S-g")
    );
    assert_eq!(combo(KeyCode::Char('G'), CtKeyModifiers::NONE).as_deref(), Some("S-g"));
}

#[test]
fn shifted_symbols_keep_their_name() {
    assert_eq!(
        combo(KeyCode::Char('?'), CtKeyModifiers::SHIFT).as_deref(),
        Some("?")
    );
}

#[test]
fn backtab_is_shift_tab() {
    assert_eq!(
        combo(KeyCode::BackTab, CtKeyModifiers::SHIFT).as_deref(),
        Some("S-tab")
    );
    assert_eq!(combo(KeyCode::Tab, CtKeyModifiers::NONE).as_deref(), Some("tab"));
}

#[test]
fn named_keys() {
    assert_eq!(combo(KeyCode::Esc, CtKeyModifiers::NONE).as_deref(), Some("escape"));
    assert_eq!(combo(KeyCode::Char(' '), CtKeyModifiers::NONE).as_deref(), Some("space"));
    assert_eq!(combo(KeyCode::F(5), CtKeyModifiers::NONE).as_deref(), Some("f5"));
    assert_eq!(combo(KeyCode::CapsLock, CtKeyModifiers::NONE), None);
}

#[test]
fn key_release_is_ignored() {
    let mut event = press(KeyCode::Char('q'), CtKeyModifiers::NONE);
    event.kind = KeyEventKind::Release;
    assert_eq!(into_key_input(event), None);
}

#[test]
fn resize_becomes_host_event() {
    assert_eq!(
        into_host_event(crossterm::event::Event::Resize(100, 30)),
        Some(HostEvent::Resize(100, 30))
    );
    assert_eq!(into_host_event(crossterm::event::Event::FocusLost), None);
}
