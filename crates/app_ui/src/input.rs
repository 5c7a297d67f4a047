//! Translation of winit input into key chords and gallery commands
//!
//! Chords use the same textual form as the `[keybindings]` table, e.g.
//! "Right", "Ctrl+Home", "o". Resolution happens in the key router.

use app_core::GalleryCommand;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Tracks modifier state and turns key presses into chord strings
#[derive(Debug, Default)]
pub struct InputHandler {
    modifiers: ModifiersState,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update modifier state
    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Chord for a key press, `None` for releases and unnamed keys
    pub fn chord(&self, event: &KeyEvent) -> Option<String> {
        if event.state != ElementState::Pressed {
            return None;
        }

        let key = key_to_string(&event.logical_key)?;
        let chord = build_key_string(self.modifiers, &key);
        tracing::trace!("Key pressed: {}", chord);
        Some(chord)
    }

    /// Mouse side buttons step through the gallery
    pub fn handle_mouse_button(&self, button: MouseButton, state: ElementState) -> Option<GalleryCommand> {
        if state != ElementState::Pressed {
            return None;
        }

        match button {
            MouseButton::Back => Some(GalleryCommand::Previous),
            MouseButton::Forward => Some(GalleryCommand::Next),
            _ => None,
        }
    }
}

/// Prefix a key name with the held modifiers
fn build_key_string(modifiers: ModifiersState, key: &str) -> String {
    let mut parts = Vec::new();

    if modifiers.control_key() {
        parts.push("Ctrl");
    }
    if modifiers.alt_key() {
        parts.push("Alt");
    }
    if modifiers.shift_key() {
        parts.push("Shift");
    }
    if modifiers.super_key() {
        parts.push("Super");
    }

    parts.push(key);
    parts.join("+")
}

/// Name of a logical key as written in keybindings
fn key_to_string(key: &Key) -> Option<String> {
    let name = match key {
        Key::Named(named) => match named {
            NamedKey::Space => "Space",
            NamedKey::Enter => "Return",
            NamedKey::Tab => "Tab",
            NamedKey::Escape => "Escape",
            NamedKey::Backspace => "Backspace",
            NamedKey::Delete => "Delete",
            NamedKey::Home => "Home",
            NamedKey::End => "End",
            NamedKey::PageUp => "PageUp",
            NamedKey::PageDown => "PageDown",
            NamedKey::ArrowUp => "Up",
            NamedKey::ArrowDown => "Down",
            NamedKey::ArrowLeft => "Left",
            NamedKey::ArrowRight => "Right",
            NamedKey::F11 => "F11",
            // Modifier presses arrive through ModifiersChanged
            NamedKey::Control | NamedKey::Alt | NamedKey::Shift | NamedKey::Super => return None,
            other => return Some(format!("{:?}", other)),
        },
        Key::Character(c) => return Some(c.to_string()),
        _ => return None,
    };

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(&Key::Named(NamedKey::ArrowLeft)).as_deref(), Some("Left"));
        assert_eq!(key_to_string(&Key::Named(NamedKey::ArrowRight)).as_deref(), Some("Right"));
        assert_eq!(key_to_string(&Key::Named(NamedKey::F5)).as_deref(), Some("F5"));
        assert_eq!(key_to_string(&Key::Character(SmolStr::new("o"))).as_deref(), Some("o"));
        assert_eq!(key_to_string(&Key::Named(NamedKey::Shift)), None);
    }

    #[test]
    fn test_build_key_string() {
        assert_eq!(build_key_string(ModifiersState::empty(), "Right"), "Right");
        assert_eq!(
            build_key_string(ModifiersState::CONTROL | ModifiersState::SHIFT, "Home"),
            "Ctrl+Shift+Home"
        );
    }

    #[test]
    fn test_mouse_side_buttons() {
        let input = InputHandler::new();
        assert_eq!(
            input.handle_mouse_button(MouseButton::Back, ElementState::Pressed),
            Some(GalleryCommand::Previous)
        );
        assert_eq!(
            input.handle_mouse_button(MouseButton::Forward, ElementState::Pressed),
            Some(GalleryCommand::Next)
        );
        assert_eq!(input.handle_mouse_button(MouseButton::Forward, ElementState::Released), None);
        assert_eq!(input.handle_mouse_button(MouseButton::Left, ElementState::Pressed), None);
    }
}
