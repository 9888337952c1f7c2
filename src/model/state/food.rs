//! Spatial food-resource map.

use rand::Rng;
use std::collections::HashSet;

/// Set of grid cells currently holding one food item each, bounded by a
/// configured maximum.
///
/// Set iteration order must never feed back into simulation logic; callers
/// use membership queries only, and snapshots sort before exposing.
#[derive(Debug, Clone)]
pub struct FoodMap {
    width: u16,
    height: u16,
    max_items: usize,
    locations: HashSet<(i32, i32)>,
}

impl FoodMap {
    /// Random coordinate draws per placement before giving up. Placement is
    /// an approximate guarantee: collisions under high occupancy are an
    /// expected, silent failure rather than an exhaustive search.
    const PLACEMENT_ATTEMPTS: usize = 10;

    pub fn new(width: u16, height: u16, max_items: usize) -> Self {
        Self {
            width,
            height,
            max_items,
            locations: HashSet::new(),
        }
    }

    /// Attempts to place one food item at a random unoccupied cell.
    ///
    /// Fails without error when the map is at capacity or when all retry
    /// draws land on occupied cells.
    pub fn spawn_food_item(&mut self, rng: &mut impl Rng) -> bool {
        if self.locations.len() >= self.max_items {
            return false;
        }
        for _ in 0..Self::PLACEMENT_ATTEMPTS {
            let x = rng.gen_range(0..i32::from(self.width));
            let y = rng.gen_range(0..i32::from(self.height));
            if self.locations.insert((x, y)) {
                return true;
            }
        }
        false
    }

    pub fn is_food_at(&self, x: i32, y: i32) -> bool {
        self.locations.contains(&(x, y))
    }

    /// Removes the item at `(x, y)` and returns the amount removed, `0` if
    /// the cell was empty.
    pub fn remove_food(&mut self, x: i32, y: i32) -> u32 {
        u32::from(self.locations.remove(&(x, y)))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.locations.iter().copied()
    }

    /// Deterministic placement for test setups.
    #[cfg(test)]
    pub(crate) fn place_at(&mut self, x: i32, y: i32) -> bool {
        self.locations.insert((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_until_capacity() {
        let mut food = FoodMap::new(10, 10, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            food.spawn_food_item(&mut rng);
        }
        assert_eq!(food.len(), 5);
    }

    #[test]
    fn test_spawn_at_capacity_fails_without_mutation() {
        let mut food = FoodMap::new(10, 10, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        while food.len() < 3 {
            food.spawn_food_item(&mut rng);
        }
        let before: Vec<_> = {
            let mut v: Vec<_> = food.iter().collect();
            v.sort_unstable();
            v
        };
        assert!(!food.spawn_food_item(&mut rng));
        let mut after: Vec<_> = food.iter().collect();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_food_returns_amount() {
        let mut food = FoodMap::new(4, 4, 16);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(food.spawn_food_item(&mut rng));
        let (x, y) = food.iter().next().unwrap();
        assert!(food.is_food_at(x, y));
        assert_eq!(food.remove_food(x, y), 1);
        assert_eq!(food.remove_food(x, y), 0);
        assert!(!food.is_food_at(x, y));
    }

    #[test]
    fn test_saturated_tiny_grid_gives_up() {
        // 1x1 grid with the only cell occupied: every retry collides.
        let mut food = FoodMap::new(1, 1, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(food.spawn_food_item(&mut rng));
        assert!(!food.spawn_food_item(&mut rng));
        assert_eq!(food.len(), 1);
    }
}
