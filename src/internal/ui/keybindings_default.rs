use crate::internal::ui::app::Action;
use crate::internal::ui::keybindings::{KeyBindingContext, KeyBindingMap};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Create default keybindings for the application
pub fn create_default_keybindings() -> KeyBindingMap {
    let mut map = KeyBindingMap::new();
    add_global_bindings(&mut map);
    add_modal_bindings(&mut map);
    map
}

fn add_global_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Global;

    // Primary button
    map.add_binding(ctx, key_code(KeyCode::Enter), Action::RequestJoke);
    map.add_binding(ctx, key(' '), Action::RequestJoke);
    map.add_binding(ctx, key('j'), Action::RequestJoke);

    map.add_binding(ctx, key('b'), Action::RevealBonus);
    map.add_binding(ctx, key('s'), Action::ToggleSound);

    map.add_binding(ctx, key('x'), Action::DismissError);
    map.add_binding(ctx, key_code(KeyCode::Esc), Action::DismissError);

    map.add_binding(ctx, key('q'), Action::Quit);
    map.add_binding(
        ctx,
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Action::Quit,
    );
}

fn add_modal_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Modal;

    map.add_binding(ctx, key_code(KeyCode::Esc), Action::DismissBonus);
    map.add_binding(ctx, key_code(KeyCode::Enter), Action::DismissBonus);
    map.add_binding(ctx, key(' '), Action::DismissBonus);
    map.add_binding(ctx, key('q'), Action::DismissBonus);
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_quits_unless_overlay_open() {
        let map = create_default_keybindings();

        assert_eq!(
            map.get_action(&key('q'), KeyBindingContext::Global),
            Some(Action::Quit)
        );
        assert_eq!(
            map.get_action(&key('q'), KeyBindingContext::Modal),
            Some(Action::DismissBonus)
        );
    }

    #[test]
    fn test_enter_dismisses_overlay_instead_of_fetching() {
        let map = create_default_keybindings();
        let enter = key_code(KeyCode::Enter);

        assert_eq!(
            map.get_action(&enter, KeyBindingContext::Global),
            Some(Action::RequestJoke)
        );
        assert_eq!(
            map.get_action(&enter, KeyBindingContext::Modal),
            Some(Action::DismissBonus)
        );
    }

    #[test]
    fn test_other_primary_keys_do_not_fetch_under_overlay() {
        let map = create_default_keybindings();

        assert_eq!(
            map.get_action(&key(' '), KeyBindingContext::Modal),
            Some(Action::DismissBonus)
        );
        assert_eq!(map.get_action(&key('j'), KeyBindingContext::Modal), None);
        assert_eq!(
            map.get_action(
                &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                KeyBindingContext::Modal
            ),
            Some(Action::Quit)
        );
    }
}
