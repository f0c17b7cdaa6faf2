//! Floor generation
//!
//! Depth 0 is a fixed tutorial. Deeper floors draft monsters from a
//! difficulty-rated manual against a budget that grows with depth.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::monster::Monster;
use crate::tuning::LevelTuning;

/// Manual entry templates; the dragon picks its head count when spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Species {
    Fixed(Monster),
    RandomDragon,
}

impl Species {
    fn spawn<R: Rng + ?Sized>(self, rng: &mut R) -> Monster {
        match self {
            Species::Fixed(m) => m,
            Species::RandomDragon => Monster::Dragon {
                heads: rng.random_range(1..=10),
            },
        }
    }
}

/// Every monster a floor can contain, with its difficulty rating.
/// Duplicates make a monster more likely to be drafted.
const MANUAL: [(Species, i32); 19] = [
    (Species::Fixed(Monster::Modron { rank: 1 }), 1),
    (Species::Fixed(Monster::CobbleGoblin), 1),
    (Species::Fixed(Monster::Modron { rank: 2 }), 1),
    (Species::Fixed(Monster::Highdra), 2),
    (Species::Fixed(Monster::PrimeGoblin), 3),
    (Species::Fixed(Monster::Modron { rank: 3 }), 3),
    (Species::Fixed(Monster::Foocubus { inc: true }), 4),
    (Species::Fixed(Monster::Foocubus { inc: true }), 4),
    (Species::Fixed(Monster::Foocubus { inc: false }), 4),
    (Species::Fixed(Monster::Foocubus { inc: false }), 4),
    (Species::Fixed(Monster::Modron { rank: 4 }), 5),
    (Species::Fixed(Monster::GelatinousSquare), 6),
    (Species::Fixed(Monster::GelatinousSquare), 6),
    (Species::Fixed(Monster::Modron { rank: 5 }), 6),
    (Species::Fixed(Monster::GelatinousCube), 7),
    (Species::Fixed(Monster::GelatinousCube), 7),
    (Species::Fixed(Monster::Pirate { threshold: 2 }), 8),
    (Species::RandomDragon, 8),
    (Species::Fixed(Monster::Pirate { threshold: 3 }), 12),
];

/// Difficulty rating of a monster as listed in the manual
#[cfg(test)]
fn difficulty_of(monster: &Monster) -> i32 {
    match monster {
        Monster::Dragon { .. } => 8,
        m => MANUAL
            .iter()
            .find(|(s, _)| *s == Species::Fixed(*m))
            .map(|&(_, d)| d)
            .unwrap_or(1),
    }
}

/// The tutorial floor
pub const TUTORIAL: [Monster; 3] = [
    Monster::Modron { rank: 1 },
    Monster::CobbleGoblin,
    Monster::Modron { rank: 2 },
];

/// One floor of monsters, fought front to back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    monsters: Vec<Monster>,
}

impl Level {
    pub fn new(monsters: Vec<Monster>) -> Self {
        Self { monsters }
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Monster> {
        self.monsters.get(index)
    }

    /// Generate the floor at `depth`
    pub fn generate<R: Rng + ?Sized>(depth: u32, rng: &mut R, tuning: &LevelTuning) -> Self {
        if depth == 0 {
            return Self::new(TUTORIAL.to_vec());
        }

        let depth_i = depth as i32;

        // Near-sort the manual hardest first
        let mut manual: Vec<(f64, Species, i32)> = MANUAL
            .iter()
            .map(|&(species, difficulty)| (jittered(rng, difficulty, tuning.draft_jitter), species, difficulty))
            .collect();
        manual.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut budget = depth_i * tuning.budget_per_depth + tuning.budget_base;
        let target = target_count(rng, depth, tuning);

        let mut drafted: Vec<(Monster, i32)> = Vec::with_capacity(target);
        let mut attempts = 0;
        while drafted.len() < target && attempts < tuning.max_attempts {
            attempts += 1;
            let floor = (budget + 2).div_euclid(3).max(0);
            let ceiling = if budget > floor {
                rng.random_range(floor..=budget)
            } else {
                budget.max(0)
            };

            match manual.iter().find(|(_, _, d)| *d <= ceiling) {
                Some(&(_, species, difficulty)) => {
                    drafted.push((species.spawn(rng), difficulty));
                    budget -= difficulty;
                }
                // Nothing fits: loosen the budget instead of stalling
                None => budget += depth_i,
            }
        }

        if drafted.is_empty() {
            log::warn!("Floor {} draft came up empty, falling back to a monodron", depth + 1);
            drafted.push((Monster::Modron { rank: 1 }, 1));
        }

        // Near-sort the floor easiest first
        let mut ordered: Vec<(f64, Monster)> = drafted
            .into_iter()
            .map(|(monster, difficulty)| (jittered(rng, difficulty, tuning.order_jitter), monster))
            .collect();
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        let monsters: Vec<Monster> = ordered.into_iter().map(|(_, m)| m).collect();
        log::info!(
            "Floor {}: {} monsters after {} attempts, budget left {}",
            depth + 1,
            monsters.len(),
            attempts,
            budget
        );
        Self::new(monsters)
    }
}

/// Sort key: difficulty plus uniform noise in [-amplitude, amplitude)
fn jittered<R: Rng + ?Sized>(rng: &mut R, difficulty: i32, amplitude: f64) -> f64 {
    difficulty as f64 + (rng.random::<f64>() - 0.5) * 2.0 * amplitude
}

/// Monster count for a floor, in [min_monsters, max_monsters]
fn target_count<R: Rng + ?Sized>(rng: &mut R, depth: u32, tuning: &LevelTuning) -> usize {
    let min = tuning.min_monsters.max(1);
    let max = tuning.max_monsters.max(min);
    let upper = depth as usize * 2;
    let drawn = if upper > min { rng.random_range(min..upper) } else { min };
    drawn.clamp(min, max)
}
