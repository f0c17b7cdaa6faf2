//! Player classes and their starting loadouts

use serde::{Deserialize, Serialize};

use super::die::{Die, Sides};
use super::die_mod::{DieMod, Metal};
use super::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    Fighter,
    Cleric,
    Rogue,
    Wizard,
}

impl ClassType {
    pub const ALL: [ClassType; 4] = [
        ClassType::Fighter,
        ClassType::Cleric,
        ClassType::Rogue,
        ClassType::Wizard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Fighter => "Fighter",
            ClassType::Cleric => "Cleric",
            ClassType::Rogue => "Rogue",
            ClassType::Wizard => "Wizard",
        }
    }

    pub fn power(&self) -> ClassPower {
        match self {
            ClassType::Fighter => ClassPower::SecondWind,
            ClassType::Cleric => ClassPower::Rebuke,
            ClassType::Rogue => ClassPower::Cheat,
            ClassType::Wizard => ClassPower::Teleport,
        }
    }
}

/// Once-per-floor class abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassPower {
    /// Reroll one die and return it to the ready pool
    SecondWind,
    /// Defeat the current demon or pirate outright
    Rebuke,
    /// Passive: the first die lost on a floor comes back
    Cheat,
    /// Swap the ready and used pools
    Teleport,
}

impl ClassPower {
    pub fn name(&self) -> &'static str {
        match self {
            ClassPower::SecondWind => "Second Wind",
            ClassPower::Rebuke => "Rebuke",
            ClassPower::Cheat => "Cheat",
            ClassPower::Teleport => "Teleport",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ClassPower::SecondWind => "Re-roll and restore one of your dice once per floor.",
            ClassPower::Rebuke => "Immediately defeat a demon or pirate once per floor.",
            ClassPower::Cheat => {
                "The first time you would lose a die on a floor, you get it back instead."
            }
            ClassPower::Teleport => "Exchange your used and ready dice once per floor.",
        }
    }

    pub fn is_passive(&self) -> bool {
        matches!(self, ClassPower::Cheat)
    }
}

/// A class template. Runs clone its dice and items.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerClass {
    pub class_type: ClassType,
    pub description: &'static str,
    pub power: ClassPower,
    /// 1 (easiest) to 4
    pub difficulty: u8,
    pub dice: Vec<Die>,
    pub items: Vec<Item>,
}

impl PlayerClass {
    pub fn new(class_type: ClassType) -> Self {
        let (description, difficulty, dice, items) = match class_type {
            ClassType::Fighter => (
                "A brave adventurer with a trusty cardboard sword.",
                1,
                dice(&[Sides::D4, Sides::D6, Sides::D6, Sides::D6, Sides::D8]),
                vec![
                    Item::equipment(DieMod::Nloon {
                        multiplier: 2,
                        metal: Metal::Silver,
                    }),
                    Item::healing_potion(),
                    Item::luck_potion(),
                ],
            ),
            ClassType::Cleric => (
                "A devotee of one of the many deities that sponsor dungeon-delving.",
                2,
                dice(&[Sides::D4; 5]),
                vec![
                    Item::equipment(DieMod::Nloon {
                        multiplier: 2,
                        metal: Metal::Gold,
                    }),
                    Item::equipment(DieMod::Nloon {
                        multiplier: 3,
                        metal: Metal::Gold,
                    }),
                    Item::equipment(DieMod::ModronCore { rank: 5 }),
                    Item::greater_healing_potion(),
                ],
            ),
            ClassType::Rogue => (
                "A swindler with a clever smirk and cleverer fingers.",
                3,
                dice(&[Sides::D2, Sides::D2, Sides::D2, Sides::D4, Sides::D6]),
                vec![
                    Item::equipment(DieMod::DemonPart { inc: true }),
                    Item::equipment(DieMod::DemonPart { inc: false }),
                ],
            ),
            ClassType::Wizard => {
                let mut dice = dice(&[Sides::D10, Sides::D10, Sides::D12, Sides::D20]);
                dice.push(Die::with_mod(
                    Sides::D20,
                    DieMod::Nloon {
                        multiplier: 3,
                        metal: Metal::Silver,
                    },
                ));
                (
                    "A scholar of the arcane spelunking for more hands-on research.",
                    4,
                    dice,
                    vec![Item::healing_potion(), Item::luck_potion()],
                )
            }
        };

        Self {
            class_type,
            description,
            power: class_type.power(),
            difficulty,
            dice,
            items,
        }
    }

    pub fn all() -> Vec<PlayerClass> {
        ClassType::ALL.into_iter().map(Self::new).collect()
    }

    /// One-line dice summary for the class picker
    pub fn dice_summary(&self) -> String {
        let dice: Vec<String> = self.dice.iter().map(Die::to_string).collect();
        format!("Dice: {}", dice.join(", "))
    }

    pub fn items_summary(&self) -> String {
        let items: Vec<String> = self.items.iter().map(Item::name).collect();
        format!("Items: {}", items.join(", "))
    }
}

fn dice(sides: &[Sides]) -> Vec<Die> {
    sides.iter().copied().map(Die::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ITEM_CAPACITY, MAX_DIE_COUNT};

    #[test]
    fn test_loadouts_fit_caps() {
        for class in PlayerClass::all() {
            assert_eq!(class.dice.len(), 5, "{:?}", class.class_type);
            assert!(class.dice.len() <= MAX_DIE_COUNT);
            assert!(class.items.len() <= ITEM_CAPACITY);
        }
    }

    #[test]
    fn test_difficulty_ordering() {
        let ratings: Vec<u8> = PlayerClass::all().iter().map(|c| c.difficulty).collect();
        assert_eq!(ratings, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_wizard_has_modded_die() {
        let wizard = PlayerClass::new(ClassType::Wizard);
        assert_eq!(
            wizard.dice.last().and_then(|d| d.die_mod),
            Some(DieMod::Nloon {
                multiplier: 3,
                metal: Metal::Silver
            })
        );
        assert!(wizard.dice_summary().ends_with("d20 with silver trebloon"));
    }

    #[test]
    fn test_only_cheat_is_passive() {
        for class in ClassType::ALL {
            assert_eq!(class.power().is_passive(), class == ClassType::Rogue);
        }
    }
}
