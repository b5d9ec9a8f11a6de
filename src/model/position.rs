use std::fmt;

use serde::{Deserialize, Serialize};

/// A window's outer frame in root coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    /// Window managers report zero or negative geometry while a window is
    /// being mapped, moved between monitors or torn down.
    pub fn is_valid(&self) -> bool {
        self.x > 0 && self.y > 0 && self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// The single remembered PiP geometry. Lives as long as the reactor is
/// enabled; nothing is written to disk.
#[derive(Debug, Default)]
pub struct PositionStore {
    last: Option<Rect>,
}

impl PositionStore {
    pub fn new() -> Self { Self::default() }

    /// Overwrites the remembered position. Invalid rectangles are dropped and
    /// leave the previous value in place.
    pub fn save(&mut self, rect: Rect) -> bool {
        if !rect.is_valid() {
            return false;
        }
        self.last = Some(rect);
        true
    }

    pub fn get(&self) -> Option<Rect> { self.last.filter(Rect::is_valid) }

    pub fn clear(&mut self) { self.last = None; }
}
