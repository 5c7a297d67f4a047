//! Keyboard binding for the gallery
//!
//! A [`KeyboardBinding`] maps key chords ("Right", "Ctrl+Home") to commands.
//! Bindings only take effect while registered in a [`KeyRouter`]; the
//! returned [`BindingGuard`] removes the registration when dropped, so a
//! binding's lifetime is tied to the scope that owns the guard. The host
//! binds when the gallery gains focus and drops the guard when it loses it.

use crate::command::{Command, GalleryCommand};
use crate::controller::GalleryController;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

/// Chord to command table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyboardBinding {
    keys: HashMap<String, Command>,
}

impl KeyboardBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Left/Right arrows step through the gallery
    pub fn arrows() -> Self {
        Self::new()
            .with("Left", GalleryCommand::Previous.into())
            .with("Right", GalleryCommand::Next.into())
    }

    /// Build from a `command id -> [chord]` table. Unknown commands are
    /// skipped with a warning.
    pub fn from_config(keybindings: &HashMap<String, Vec<String>>) -> Self {
        let mut binding = Self::new();

        // Sorted so a chord listed under two commands resolves deterministically
        let mut entries: Vec<_> = keybindings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (id, chords) in entries {
            let command = match id.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    tracing::warn!("Skipping keybinding: {}", e);
                    continue;
                }
            };

            for chord in chords {
                binding.insert(chord, command);
            }
        }

        binding
    }

    pub fn with(mut self, chord: &str, command: Command) -> Self {
        self.insert(chord, command);
        self
    }

    pub fn insert(&mut self, chord: &str, command: Command) {
        let key = normalize_chord(chord);
        if let Some(previous) = self.keys.insert(key.clone(), command) {
            if previous != command {
                tracing::warn!("Key {} rebound from {} to {}", key, previous, command);
            }
        }
    }

    pub fn resolve(&self, chord: &str) -> Option<Command> {
        self.keys.get(&normalize_chord(chord)).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Canonical chord form: case-insensitive, modifiers in a fixed order
fn normalize_chord(chord: &str) -> String {
    let mut modifiers = Vec::new();
    let mut key = String::new();

    for part in chord.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.push(0),
            "alt" => modifiers.push(1),
            "shift" => modifiers.push(2),
            "super" | "cmd" | "meta" => modifiers.push(3),
            other => key = other.to_string(),
        }
    }

    modifiers.sort_unstable();
    modifiers.dedup();

    const NAMES: [&str; 4] = ["ctrl", "alt", "shift", "super"];
    let mut parts: Vec<&str> = modifiers.iter().map(|&m| NAMES[m]).collect();
    parts.push(&key);
    parts.join("+")
}

/// Outcome of routing a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Applied to the controller; the key must not be forwarded further
    Handled,
    /// Bound to a command the controller does not own
    Unhandled(Command),
    /// Not bound in any active binding
    Ignored,
}

impl KeyDisposition {
    pub fn is_consumed(&self) -> bool {
        !matches!(self, KeyDisposition::Ignored)
    }
}

type Registry = Mutex<Vec<(u64, KeyboardBinding)>>;

/// Registry of active keyboard bindings
#[derive(Default)]
pub struct KeyRouter {
    bindings: Arc<Registry>,
    next_id: AtomicU64,
}

impl KeyRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a binding until the returned guard is dropped
    #[must_use = "the binding is removed as soon as the guard is dropped"]
    pub fn bind(&self, binding: KeyboardBinding) -> BindingGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.bindings.lock().push((id, binding));
        tracing::debug!("Keyboard binding {} attached", id);

        BindingGuard {
            id,
            registry: Arc::downgrade(&self.bindings),
        }
    }

    pub fn is_bound(&self) -> bool {
        !self.bindings.lock().is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.bindings.lock().len()
    }

    /// Look up a chord; the most recently attached binding wins
    pub fn resolve(&self, chord: &str) -> Option<Command> {
        self.bindings
            .lock()
            .iter()
            .rev()
            .find_map(|(_, binding)| binding.resolve(chord))
    }

    /// Route a key press to the controller
    pub fn dispatch(
        &self,
        chord: &str,
        controller: &mut GalleryController,
        now: Instant,
    ) -> KeyDisposition {
        let Some(command) = self.resolve(chord) else {
            return KeyDisposition::Ignored;
        };

        match command.as_gallery() {
            Some(cmd) => {
                controller.execute(&cmd, now);
                KeyDisposition::Handled
            }
            None => KeyDisposition::Unhandled(command),
        }
    }
}

/// Keeps a binding active; dropping it detaches the binding
#[derive(Debug)]
pub struct BindingGuard {
    id: u64,
    registry: Weak<Registry>,
}

impl BindingGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().retain(|(id, _)| *id != self.id);
            tracing::debug!("Keyboard binding {} detached", self.id);
        }
    }
}
