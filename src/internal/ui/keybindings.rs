use crate::internal::ui::app::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Where a key press is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBindingContext {
    Global,
    /// The bonus overlay is open.
    Modal,
}

/// Maps key events to actions
#[derive(Debug, Clone, Default)]
pub struct KeyBindingMap {
    global: HashMap<KeyEvent, Action>,
    modal: HashMap<KeyEvent, Action>,
}

impl KeyBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action for a given key event in a specific context.
    /// While the overlay is open only its own bindings apply, plus any
    /// global key bound to `Quit`.
    pub fn get_action(&self, key: &KeyEvent, context: KeyBindingContext) -> Option<Action> {
        match context {
            KeyBindingContext::Global => self.global.get(key).cloned(),
            KeyBindingContext::Modal => self
                .modal
                .get(key)
                .or_else(|| self.global.get(key).filter(|a| **a == Action::Quit))
                .cloned(),
        }
    }

    pub fn add_binding(&mut self, context: KeyBindingContext, key: KeyEvent, action: Action) {
        let map = match context {
            KeyBindingContext::Global => &mut self.global,
            KeyBindingContext::Modal => &mut self.modal,
        };
        map.insert(key, action);
    }

    /// Merge custom keybindings from configuration
    pub fn merge_config(&mut self, config: &crate::config::KeyBindingConfig) {
        let mut merge = |ctx: KeyBindingContext, bindings: &HashMap<String, Action>| {
            for (key_str, action) in bindings {
                if !action.is_bindable() {
                    tracing::warn!("Action {:?} cannot be bound to '{}'", action, key_str);
                    continue;
                }
                match parse_key_str(key_str) {
                    Some(key_event) => self.add_binding(ctx, key_event, action.clone()),
                    None => tracing::warn!("Invalid key string in config: {}", key_str),
                }
            }
        };

        merge(KeyBindingContext::Global, &config.global);
        merge(KeyBindingContext::Modal, &config.modal);
    }
}

/// Parse a key string into a KeyEvent
/// Supported formats:
/// - Single char: "j", "b", "1"
/// - Special keys: "Enter", "Space", "Tab", "Esc", "Up", "Down", "Left", "Right"
/// - With modifiers: "Ctrl+C", "Shift+Tab"
pub fn parse_key_str(key_str: &str) -> Option<KeyEvent> {
    let parts: Vec<&str> = key_str.split('+').collect();
    let (key_part, modifier_parts) = parts.split_last()?;

    let mut modifiers = KeyModifiers::empty();
    for modifier in modifier_parts {
        match modifier.to_lowercase().as_str() {
            "ctrl" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match *key_part {
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Char(' '),
        "Tab" => KeyCode::Tab,
        "Esc" => KeyCode::Esc,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Backspace" => KeyCode::Backspace,
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}
