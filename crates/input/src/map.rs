//! Key mapping from terminal events to game commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a game command.
///
/// Chords with Control or Alt are never commands, so Ctrl-C cannot hold.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(Command::SoftDrop),

        // Rotation (clockwise only)
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(Command::Rotate),

        // Actions
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('c' | 'C') => Some(Command::Hold),
        KeyCode::Char('p' | 'P') | KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Char('r' | 'R') => Some(Command::Reset),

        _ => None,
    }
}

/// Presses and auto-repeats count; releases do not.
pub fn is_press(key: &KeyEvent) -> bool {
    matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(command_for_key(key(KeyCode::Left)), Some(Command::MoveLeft));
        assert_eq!(command_for_key(key(KeyCode::Right)), Some(Command::MoveRight));
        assert_eq!(command_for_key(key(KeyCode::Down)), Some(Command::SoftDrop));

        assert_eq!(command_for_key(key(KeyCode::Char('H'))), Some(Command::MoveLeft));
        assert_eq!(command_for_key(key(KeyCode::Char('d'))), Some(Command::MoveRight));
        assert_eq!(command_for_key(key(KeyCode::Char('J'))), Some(Command::SoftDrop));
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(command_for_key(key(KeyCode::Up)), Some(Command::Rotate));
        assert_eq!(command_for_key(key(KeyCode::Char('w'))), Some(Command::Rotate));
        assert_eq!(command_for_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(command_for_key(key(KeyCode::Char(' '))), Some(Command::HardDrop));
        assert_eq!(command_for_key(key(KeyCode::Char('C'))), Some(Command::Hold));
        assert_eq!(command_for_key(key(KeyCode::Char('p'))), Some(Command::TogglePause));
        assert_eq!(command_for_key(key(KeyCode::Esc)), Some(Command::TogglePause));
        assert_eq!(command_for_key(key(KeyCode::Char('r'))), Some(Command::Reset));
    }

    #[test]
    fn test_control_chords_are_not_commands() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(ctrl_c), None);
        assert!(should_quit(ctrl_c));
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(key(KeyCode::Char('q'))));
        assert!(should_quit(key(KeyCode::Char('Q'))));
        assert!(!should_quit(key(KeyCode::Char('x'))));
        assert!(!should_quit(key(KeyCode::Char('c'))));
    }

    #[test]
    fn test_release_is_not_a_press() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(!is_press(&release));
        assert!(is_press(&key(KeyCode::Left)));
    }
}
