use serde::{Deserialize, Serialize};

/// A point in diagram (scene) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Pos) -> Pos {
        Pos::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}
