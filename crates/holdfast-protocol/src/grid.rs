use serde::{Deserialize, Serialize};

/// Square-grid coordinates. `(0, 0)` is the top-left tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const DIRECTIONS: [Position; 4] = [
        Position { x: 1, y: 0 },  // East
        Position { x: -1, y: 0 }, // West
        Position { x: 0, y: 1 },  // South
        Position { x: 0, y: -1 }, // North
    ];

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the movement and range metric used throughout.
    #[inline]
    pub fn distance(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The four orthogonally adjacent positions, unclamped.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Self::DIRECTIONS.into_iter().map(move |d| self + d)
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_manhattan() {
        let a = Position::new(2, 3);
        let b = Position::new(5, 1);
        assert_eq!(a.distance(b), 5);
        assert_eq!(b.distance(a), 5);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn neighbors_are_four_adjacent() {
        let center = Position::new(0, 0);
        let neighbors: Vec<_> = center.neighbors().collect();
        assert_eq!(neighbors.len(), 4);
        assert!(neighbors.iter().all(|n| center.distance(*n) == 1));
    }
}
