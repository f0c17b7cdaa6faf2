//! Dice and rolling

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::die_mod::DieMod;

/// Lowest value any roll can produce
pub const MIN_ROLL: u32 = 1;
/// Highest value any roll can produce (two display digits)
pub const MAX_ROLL: u32 = 99;

/// Supported die shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sides {
    D2,
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl Sides {
    pub const ALL: [Sides; 7] = [
        Sides::D2,
        Sides::D4,
        Sides::D6,
        Sides::D8,
        Sides::D10,
        Sides::D12,
        Sides::D20,
    ];

    /// Shapes a treasure chest can hold
    pub const TREASURE: [Sides; 6] = [
        Sides::D4,
        Sides::D6,
        Sides::D8,
        Sides::D10,
        Sides::D12,
        Sides::D20,
    ];

    pub fn count(self) -> u32 {
        match self {
            Sides::D2 => 2,
            Sides::D4 => 4,
            Sides::D6 => 6,
            Sides::D8 => 8,
            Sides::D10 => 10,
            Sides::D12 => 12,
            Sides::D20 => 20,
        }
    }

    #[cfg(test)]
    pub fn from_count(count: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.count() == count)
    }

    /// Column in the dice atlas
    pub fn atlas_index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Sides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.count())
    }
}

/// A single die, optionally carrying one modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Die {
    pub sides: Sides,
    pub die_mod: Option<DieMod>,
}

impl Die {
    pub fn new(sides: Sides) -> Self {
        Self { sides, die_mod: None }
    }

    pub fn with_mod(sides: Sides, die_mod: DieMod) -> Self {
        Self {
            sides,
            die_mod: Some(die_mod),
        }
    }

    /// Roll the die: uniform face, then the modifier, then clamp to [1, 99]
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let raw = rng.random_range(1..=self.sides.count());
        let modified = match &self.die_mod {
            Some(m) => m.modify_roll(self.sides, raw, rng),
            None => raw as i64,
        };
        modified.clamp(MIN_ROLL as i64, MAX_ROLL as i64) as u32
    }

    /// Mount a modifier, returning the one it replaced
    pub fn equip(&mut self, die_mod: DieMod) -> Option<DieMod> {
        self.die_mod.replace(die_mod)
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.die_mod {
            Some(m) => write!(f, "{} with {}", self.sides, m.name()),
            None => write!(f, "{}", self.sides),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::die_mod::Metal;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_plain_d6_is_roughly_uniform() {
        let mut rng = Pcg32::seed_from_u64(6);
        let die = Die::new(Sides::D6);
        let mut counts = [0u32; 6];
        for _ in 0..1000 {
            let roll = die.roll(&mut rng);
            assert!((1..=6).contains(&roll));
            counts[(roll - 1) as usize] += 1;
        }
        // Chi-square with 5 degrees of freedom; 20.5 is p ~ 0.001
        let expected = 1000.0 / 6.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        assert!(chi2 < 20.5, "chi-square too high: {chi2} ({counts:?})");
    }

    #[test]
    fn test_modron_core_fixes_roll() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut die = Die::new(Sides::D20);
        die.equip(DieMod::ModronCore { rank: 3 });
        for _ in 0..50 {
            assert_eq!(die.roll(&mut rng), 3);
        }
    }

    #[test]
    fn test_equip_replaces_old_mod() {
        let mut die = Die::with_mod(Sides::D6, DieMod::HighdraHead);
        let old = die.equip(DieMod::ModronCore { rank: 2 });
        assert_eq!(old, Some(DieMod::HighdraHead));
        assert_eq!(die.die_mod, Some(DieMod::ModronCore { rank: 2 }));
    }

    #[test]
    fn test_succubus_tail_never_rolls_zero() {
        let mut rng = Pcg32::seed_from_u64(1);
        let die = Die::with_mod(Sides::D2, DieMod::DemonPart { inc: false });
        for _ in 0..100 {
            assert!(die.roll(&mut rng) >= 1);
        }
    }

    #[test]
    fn test_sides_from_count() {
        assert_eq!(Sides::from_count(12), Some(Sides::D12));
        assert_eq!(Sides::from_count(3), None);
        assert_eq!(Sides::D20.to_string(), "d20");
    }

    proptest! {
        #[test]
        fn prop_plain_roll_within_sides(seed in any::<u64>(), idx in 0usize..7) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let die = Die::new(Sides::ALL[idx]);
            let roll = die.roll(&mut rng);
            prop_assert!(roll >= 1 && roll <= die.sides.count());
        }

        #[test]
        fn prop_highdra_head_rolls_max(seed in any::<u64>(), idx in 0usize..7) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let die = Die::with_mod(Sides::ALL[idx], DieMod::HighdraHead);
            prop_assert_eq!(die.roll(&mut rng), die.sides.count());
        }

        #[test]
        fn prop_modded_roll_clamped(seed in any::<u64>(), idx in 0usize..7, n in 2u8..=3) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for m in [
                DieMod::Nloon { multiplier: n, metal: Metal::Gold },
                DieMod::Nloon { multiplier: n, metal: Metal::Silver },
            ] {
                let die = Die::with_mod(Sides::ALL[idx], m);
                let roll = die.roll(&mut rng);
                prop_assert!((MIN_ROLL..=MAX_ROLL).contains(&roll));
            }
        }
    }
}
