use std::collections::VecDeque;

use holdfast_protocol::{BuildingKind, Position, Side};

use crate::economy::Cost;

/// Buildings occupy a square footprint of this side length.
pub const FOOTPRINT: i32 = 2;

#[derive(Clone, Copy, Debug)]
pub struct BuildingStats {
    pub hits: i32,
    pub cost: Cost,
    /// Turns of construction before the building goes live. Zero for every
    /// current kind, so placement completes immediately.
    pub build_time: u32,
}

const CASTLE: BuildingStats = BuildingStats {
    hits: 6,
    cost: Cost::FREE,
    build_time: 0,
};

const BARRACKS: BuildingStats = BuildingStats {
    hits: 3,
    cost: Cost {
        wood: 120,
        stone: 80,
        ..Cost::FREE
    },
    build_time: 0,
};

const FARM: BuildingStats = BuildingStats {
    hits: 2,
    cost: Cost {
        wood: 80,
        ..Cost::FREE
    },
    build_time: 0,
};

const MINE: BuildingStats = BuildingStats {
    hits: 2,
    cost: Cost {
        wood: 60,
        stone: 80,
        ..Cost::FREE
    },
    build_time: 0,
};

pub fn building_stats(kind: BuildingKind) -> &'static BuildingStats {
    match kind {
        BuildingKind::Castle => &CASTLE,
        BuildingKind::Barracks => &BARRACKS,
        BuildingKind::Farm => &FARM,
        BuildingKind::Mine => &MINE,
    }
}

/// The four tiles of a 2x2 footprint, row-major from the top-left corner.
pub fn footprint(top_left: Position) -> [Position; 4] {
    [
        top_left,
        Position::new(top_left.x + 1, top_left.y),
        Position::new(top_left.x, top_left.y + 1),
        Position::new(top_left.x + 1, top_left.y + 1),
    ]
}

#[derive(Clone, Debug)]
pub struct Building {
    pub kind: BuildingKind,
    pub owner: Side,
    /// Top-left corner of the footprint; absent until placed.
    pub top_left: Option<Position>,
    pub hits: i32,
}

impl Building {
    pub fn new(kind: BuildingKind, owner: Side) -> Self {
        Self {
            kind,
            owner,
            top_left: None,
            hits: building_stats(kind).hits,
        }
    }

    pub fn stats(&self) -> &'static BuildingStats {
        building_stats(self.kind)
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.hits = (self.hits - damage).max(0);
    }

    pub fn is_destroyed(&self) -> bool {
        self.hits <= 0
    }
}

/// Pending construction, ticked once per turn cycle. No current kind has a
/// nonzero build time, so items complete on the tick after enqueueing; the
/// mechanism stays for kinds that may gain one.
#[derive(Clone, Debug, Default)]
pub struct BuildQueue {
    queue: VecDeque<QueuedBuild>,
}

#[derive(Clone, Debug)]
pub struct QueuedBuild {
    pub building: Building,
    pub remaining: u32,
}

impl BuildQueue {
    pub fn enqueue(&mut self, building: Building) {
        let remaining = building.stats().build_time;
        self.queue.push_back(QueuedBuild {
            building,
            remaining,
        });
    }

    /// Advance the head of the queue by one turn; returns the building once
    /// its remaining time reaches zero.
    pub fn tick(&mut self) -> Option<Building> {
        let head = self.queue.front_mut()?;
        head.remaining = head.remaining.saturating_sub(1);
        if head.remaining == 0 {
            return self.queue.pop_front().map(|item| item.building);
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_covers_two_by_two() {
        let tiles = footprint(Position::new(3, 5));
        assert_eq!(tiles[0], Position::new(3, 5));
        assert_eq!(tiles[1], Position::new(4, 5));
        assert_eq!(tiles[2], Position::new(3, 6));
        assert_eq!(tiles[3], Position::new(4, 6));
    }

    #[test]
    fn per_kind_hits_and_costs() {
        assert_eq!(building_stats(BuildingKind::Castle).hits, 6);
        assert_eq!(building_stats(BuildingKind::Castle).cost, Cost::FREE);
        assert_eq!(building_stats(BuildingKind::Barracks).cost.wood, 120);
        assert_eq!(building_stats(BuildingKind::Farm).cost.wood, 80);
        assert_eq!(building_stats(BuildingKind::Mine).cost.stone, 80);
    }

    #[test]
    fn zero_build_time_completes_on_first_tick() {
        let mut queue = BuildQueue::default();
        queue.enqueue(Building::new(BuildingKind::Farm, Side::Human));
        assert!(!queue.is_empty());
        let done = queue.tick().expect("farm completes immediately");
        assert_eq!(done.kind, BuildingKind::Farm);
        assert!(queue.is_empty());
    }

    #[test]
    fn tick_on_empty_queue_is_none() {
        let mut queue = BuildQueue::default();
        assert!(queue.tick().is_none());
    }
}
