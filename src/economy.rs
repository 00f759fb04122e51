//! ore inventory & the shop trigger
use bevy::prelude::*;

use crate::components::{Body, Player};
use crate::terrain::Ore;

/// receives ore knocked out of destroyed blocks
pub trait OreSink {
    fn collect(&mut self, ore: Ore);
}

impl OreSink for Vec<Ore> {
    fn collect(&mut self, ore: Ore) {
        self.push(ore);
    }
}

/* ===========================================================
   inventory
   =========================================================== */
#[derive(Resource, Clone, Debug, Default)]
pub struct Inventory {
    counts: [u32; Ore::ALL.len()],
    coins: u64,
}

impl Inventory {
    pub fn count(&self, ore: Ore) -> u32 {
        self.counts[ore.index()]
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// converts every held ore into coins; returns what was earned
    pub fn sell_all(&mut self) -> u64 {
        let earned = Ore::ALL
            .iter()
            .map(|&ore| u64::from(self.count(ore)) * ore.value())
            .sum();
        self.counts = [0; Ore::ALL.len()];
        self.coins += earned;
        earned
    }
}

impl OreSink for Inventory {
    fn collect(&mut self, ore: Ore) {
        self.counts[ore.index()] += 1;
    }
}

/* ===========================================================
   trigger regions
   =========================================================== */
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerRegion {
    pub name: &'static str,
    pub min: Vec2,
    pub max: Vec2,
}

impl TriggerRegion {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[derive(Resource, Clone, Debug)]
pub struct Shop {
    pub region: TriggerRegion,
}

pub fn shop_system(
    player_q: Query<&Body, With<Player>>,
    shop: Res<Shop>,
    mut inventory: ResMut<Inventory>,
) {
    let Ok(body) = player_q.get_single() else { return };
    if !shop.region.contains(body.pos) || inventory.is_empty() {
        return;
    }
    let earned = inventory.sell_all();
    info!(
        "sold ore at {} for {earned} coins ({} total)",
        shop.region.name,
        inventory.coins()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_all_pays_by_value_and_clears() {
        let mut inv = Inventory::default();
        for ore in [Ore::Coal, Ore::Coal, Ore::Iron, Ore::Diamond] {
            inv.collect(ore);
        }
        assert_eq!(inv.count(Ore::Coal), 2);
        assert!(!inv.is_empty());

        assert_eq!(inv.sell_all(), 2 + 3 + 20);
        assert!(inv.is_empty());
        assert_eq!(inv.coins(), 25);

        assert_eq!(inv.sell_all(), 0);
        assert_eq!(inv.coins(), 25);
    }

    #[test]
    fn region_bounds_are_inclusive() {
        let r = TriggerRegion { name: "shop", min: Vec2::new(0.0, 0.0), max: Vec2::new(16.0, 8.0) };
        assert!(r.contains(Vec2::new(16.0, 8.0)));
        assert!(r.contains(Vec2::new(0.0, 4.0)));
        assert!(!r.contains(Vec2::new(16.5, 4.0)));
        assert!(!r.contains(Vec2::new(4.0, -0.1)));
    }
}
