//! Input mapping
//!
//! Directions are level-triggered: a key or pad sets its flag while held and
//! clears it on release. The simulation samples the flags once per frame.

use crate::sim::DriveInput;

/// One of the four held directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// DOM id of the on-screen pad for this direction
    pub fn pad_id(&self) -> &'static str {
        match self {
            Direction::Left => "pad-left",
            Direction::Right => "pad-right",
            Direction::Up => "pad-up",
            Direction::Down => "pad-down",
        }
    }

    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// One-shot keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Enter: start a run when none is going
    Start,
    /// Space: play again after game over
    Restart,
}

/// Map a `KeyboardEvent.code` to a direction (arrows and WASD)
pub fn direction_for_key(code: &str) -> Option<Direction> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Direction::Left),
        "ArrowRight" | "KeyD" => Some(Direction::Right),
        "ArrowUp" | "KeyW" => Some(Direction::Up),
        "ArrowDown" | "KeyS" => Some(Direction::Down),
        _ => None,
    }
}

/// Map a `KeyboardEvent.code` to a command
pub fn command_for_key(code: &str) -> Option<Command> {
    match code {
        "Enter" | "NumpadEnter" => Some(Command::Start),
        "Space" => Some(Command::Restart),
        _ => None,
    }
}

impl DriveInput {
    /// Set or clear one direction flag
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    /// Release everything (focus loss)
    pub fn clear(&mut self) {
        *self = DriveInput::default();
    }
}
