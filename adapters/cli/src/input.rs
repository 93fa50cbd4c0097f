//! Keyboard to intent mapping and key sources.

use std::{collections::VecDeque, io::BufRead};

use anyhow::{Context, Result};
use imla_core::{Direction, Intent};

/// What a single key press asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyAction {
    /// Hand the intent to the turn controller.
    Intent(Intent),
    /// End the session.
    Quit,
    /// Key has no binding.
    Ignored,
}

/// Maps a key using the numpad layout.
pub(crate) fn action_for_key(key: char) -> KeyAction {
    let intent = match key {
        '8' => Intent::MoveOrAttack(Direction::North),
        '9' => Intent::MoveOrAttack(Direction::NorthEast),
        '6' => Intent::MoveOrAttack(Direction::East),
        '3' => Intent::MoveOrAttack(Direction::SouthEast),
        '2' => Intent::MoveOrAttack(Direction::South),
        '1' => Intent::MoveOrAttack(Direction::SouthWest),
        '4' => Intent::MoveOrAttack(Direction::West),
        '7' => Intent::MoveOrAttack(Direction::NorthWest),
        '5' => Intent::Wait,
        'c' => Intent::Confirm,
        'x' => Intent::Cancel,
        'm' => Intent::OpenMenu,
        'q' => return KeyAction::Quit,
        _ => return KeyAction::Ignored,
    };
    KeyAction::Intent(intent)
}

/// Supplies keys either from a fixed script or line by line from a reader.
#[derive(Debug)]
pub(crate) struct KeySource<R> {
    pending: VecDeque<char>,
    reader: Option<R>,
}

impl<R: BufRead> KeySource<R> {
    /// Replays the characters of `script`, ignoring whitespace.
    pub(crate) fn scripted(script: &str) -> Self {
        Self {
            pending: script.chars().filter(|key| !key.is_whitespace()).collect(),
            reader: None,
        }
    }

    /// Reads keys from `reader`, one line at a time.
    pub(crate) fn interactive(reader: R) -> Self {
        Self {
            pending: VecDeque::new(),
            reader: Some(reader),
        }
    }

    /// Next key, or `None` once the source is exhausted.
    pub(crate) fn next_key(&mut self) -> Result<Option<char>> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(Some(key));
            }
            let Some(reader) = self.reader.as_mut() else {
                return Ok(None);
            };

            let mut line = String::new();
            let read = reader.read_line(&mut line).context("read key input")?;
            if read == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.chars().filter(|key| !key.is_whitespace()));
        }
    }
}
