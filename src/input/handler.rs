use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, MAX_PLAYERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Turn request for one player
    Steer { player: usize, direction: Direction },
    Restart,
    Quit,
    None,
}

/// Letter keys per player after the arrow keys, in up, down, left, right order
const LETTER_KEYS: [[char; 4]; MAX_PLAYERS - 1] = [
    ['w', 's', 'a', 'd'],
    ['i', 'k', 'j', 'l'],
    ['t', 'g', 'f', 'h'],
];

/// Key set names shown in the footer, one per player
pub const CONTROL_LABELS: [&str; MAX_PLAYERS] = ["↑↓←→", "WASD", "IJKL", "TFGH"];

/// Translates key presses into player actions
///
/// Arrow keys steer player 0, WASD player 1, IJKL player 2 and TFGH
/// player 3. In a single-player game WASD also steers player 0. Keys for
/// players that are not in the game are ignored.
pub struct InputHandler {
    players: usize,
}

impl InputHandler {
    pub fn new(players: usize) -> Self {
        Self { players }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => steer(0, Direction::Up),
            KeyCode::Down => steer(0, Direction::Down),
            KeyCode::Left => steer(0, Direction::Left),
            KeyCode::Right => steer(0, Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            // Movement - letter key sets
            KeyCode::Char(c) => self.letter_action(c.to_ascii_lowercase()),

            _ => KeyAction::None,
        }
    }

    fn letter_action(&self, c: char) -> KeyAction {
        const DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        for (set, keys) in LETTER_KEYS.iter().enumerate() {
            if let Some(slot) = keys.iter().position(|k| *k == c) {
                let player = if self.players == 1 && set == 0 { 0 } else { set + 1 };
                if player < self.players {
                    return steer(player, DIRECTIONS[slot]);
                }
                return KeyAction::None;
            }
        }
        KeyAction::None
    }
}

fn steer(player: usize, direction: Direction) -> KeyAction {
    KeyAction::Steer { player, direction }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(1)
    }
}
