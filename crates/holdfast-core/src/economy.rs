use holdfast_protocol::{Resource, ResourceAmounts};

/// A full purchase price. Kinds not charged are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cost {
    pub gold: i32,
    pub wood: i32,
    pub stone: i32,
    pub food: i32,
}

impl Cost {
    pub const FREE: Cost = Cost {
        gold: 0,
        wood: 0,
        stone: 0,
        food: 0,
    };
}

/// One side's resource stock. Amounts never go below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stockpile {
    gold: i32,
    wood: i32,
    stone: i32,
    food: i32,
}

impl Stockpile {
    pub fn from_amounts(amounts: ResourceAmounts) -> Self {
        Self {
            gold: amounts.gold.max(0),
            wood: amounts.wood.max(0),
            stone: amounts.stone.max(0),
            food: amounts.food.max(0),
        }
    }

    pub fn amounts(&self) -> ResourceAmounts {
        ResourceAmounts {
            gold: self.gold,
            wood: self.wood,
            stone: self.stone,
            food: self.food,
        }
    }

    pub fn get(&self, resource: Resource) -> i32 {
        match resource {
            Resource::Gold => self.gold,
            Resource::Wood => self.wood,
            Resource::Stone => self.stone,
            Resource::Food => self.food,
        }
    }

    /// Add to one kind, flooring the result at zero.
    pub fn add(&mut self, resource: Resource, amount: i32) {
        let slot = match resource {
            Resource::Gold => &mut self.gold,
            Resource::Wood => &mut self.wood,
            Resource::Stone => &mut self.stone,
            Resource::Food => &mut self.food,
        };
        *slot = (*slot + amount).max(0);
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.gold >= cost.gold
            && self.wood >= cost.wood
            && self.stone >= cost.stone
            && self.food >= cost.food
    }

    /// Spend the whole cost vector or nothing. A shortfall in any one kind
    /// leaves the stock untouched, so later affordability checks stay sound.
    pub fn try_spend(&mut self, cost: &Cost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.gold -= cost.gold;
        self.wood -= cost.wood;
        self.stone -= cost.stone;
        self.food -= cost.food;
        true
    }
}
