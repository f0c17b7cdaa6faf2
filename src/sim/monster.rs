//! Monsters, their win conditions and drop tables
//!
//! A monster is beaten by a die whose value satisfies the monster's predicate.
//! Predicates see the whole ready pool, since several compare the chosen value
//! against its siblings.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::die_mod::{DieMod, Metal};
use super::item::Item;
use crate::assets::{Sound, Sprite};
use crate::tuning::DropTuning;

/// Monster families share sounds and class interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Family {
    Modron,
    Dragon,
    Pirate,
    Goblin,
    Gelatin,
    Demon,
}

impl Family {
    pub fn enter_sound(self) -> Sound {
        match self {
            Family::Modron => Sound::ModronEnter,
            Family::Dragon => Sound::DragonEnter,
            Family::Pirate => Sound::PirateEnter,
            Family::Goblin => Sound::GoblinEnter,
            Family::Gelatin => Sound::GelatinEnter,
            Family::Demon => Sound::DemonEnter,
        }
    }

    /// Played when the monster is slain
    pub fn die_sound(self) -> Sound {
        match self {
            Family::Modron => Sound::ModronDie,
            Family::Dragon => Sound::DragonDie,
            Family::Pirate => Sound::PirateDie,
            Family::Goblin => Sound::GoblinDie,
            Family::Gelatin => Sound::GelatinDie,
            Family::Demon => Sound::DemonDie,
        }
    }

    /// Played when the monster escapes with a die
    pub fn win_sound(self) -> Sound {
        match self {
            Family::Modron => Sound::ModronWin,
            Family::Dragon => Sound::DragonWin,
            Family::Pirate => Sound::PirateWin,
            Family::Goblin => Sound::GoblinWin,
            Family::Gelatin => Sound::GelatinWin,
            Family::Demon => Sound::DemonWin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Monster {
    /// Beaten by multiples of `rank` (1-5)
    Modron { rank: u8 },
    /// Beaten by exactly `heads`
    Dragon { heads: u8 },
    /// Beaten by the highest value in the pool
    Highdra,
    /// Beaten by a value appearing at least `threshold` times
    Pirate { threshold: u8 },
    /// Beaten by composite numbers
    CobbleGoblin,
    /// Beaten by primes
    PrimeGoblin,
    GelatinousSquare,
    GelatinousCube,
    /// Beaten by a value one more (inc) or one less (succ) than another value
    Foocubus { inc: bool },
}

impl Monster {
    /// Whether using the die at `idx` defeats this monster
    pub fn defeated_by(&self, rolls: &[u32], idx: usize) -> bool {
        let Some(&roll) = rolls.get(idx) else {
            return false;
        };
        match *self {
            Monster::Modron { rank } => rank > 0 && roll % rank as u32 == 0,
            Monster::Dragon { heads } => roll == heads as u32,
            Monster::Highdra => rolls.iter().max() == Some(&roll),
            Monster::Pirate { threshold } => {
                rolls.iter().filter(|&&r| r == roll).count() >= threshold as usize
            }
            Monster::CobbleGoblin => roll > 1 && !is_prime(roll),
            Monster::PrimeGoblin => is_prime(roll),
            Monster::GelatinousSquare => is_perfect_power(roll, 2),
            Monster::GelatinousCube => is_perfect_power(roll, 3),
            Monster::Foocubus { inc } => rolls.iter().any(|&other| {
                if inc {
                    roll == other + 1
                } else {
                    roll + 1 == other
                }
            }),
        }
    }

    /// Roll this monster's drop table once
    pub fn item_dropped<R: Rng + ?Sized>(&self, rng: &mut R, drops: &DropTuning) -> Option<Item> {
        let chance = match self {
            Monster::Dragon { .. } => return None,
            Monster::Highdra | Monster::Pirate { .. } => drops.rare_chance,
            _ => drops.common_chance,
        };
        if rng.random::<f64>() >= chance {
            return None;
        }

        let item = match *self {
            Monster::Modron { rank } => {
                if rng.random::<f64>() < drops.modron_potion_share {
                    let pots = if rank < 3 {
                        [Item::healing_potion(), Item::luck_potion()]
                    } else {
                        [Item::greater_healing_potion(), Item::greater_luck_potion()]
                    };
                    pots.choose(rng).cloned()?
                } else {
                    Item::equipment(DieMod::ModronCore { rank })
                }
            }
            Monster::Dragon { .. } => return None,
            Monster::Highdra => Item::equipment(DieMod::HighdraHead),
            Monster::Pirate { threshold } => {
                let metal = if threshold <= 2 { Metal::Silver } else { Metal::Gold };
                let multiplier = *[2u8, 3].choose(rng)?;
                Item::equipment(DieMod::Nloon { multiplier, metal })
            }
            Monster::CobbleGoblin => Item::luck_potion(),
            Monster::PrimeGoblin => Item::greater_luck_potion(),
            Monster::GelatinousSquare => Item::healing_potion(),
            Monster::GelatinousCube => Item::greater_healing_potion(),
            Monster::Foocubus { inc } => Item::equipment(DieMod::DemonPart { inc }),
        };
        Some(item)
    }

    pub fn family(&self) -> Family {
        match self {
            Monster::Modron { .. } => Family::Modron,
            Monster::Dragon { .. } | Monster::Highdra => Family::Dragon,
            Monster::Pirate { .. } => Family::Pirate,
            Monster::CobbleGoblin | Monster::PrimeGoblin => Family::Goblin,
            Monster::GelatinousSquare | Monster::GelatinousCube => Family::Gelatin,
            Monster::Foocubus { .. } => Family::Demon,
        }
    }

    pub fn name(&self) -> String {
        match *self {
            Monster::Modron { rank } => (rank as usize)
                .checked_sub(1)
                .and_then(|i| MODRON_NAMES.get(i))
                .copied()
                .unwrap_or("modron")
                .to_string(),
            Monster::Dragon { heads } => {
                let count = HEAD_COUNTS.get(heads as usize).copied().unwrap_or("many");
                format!("{count}-headed dragon")
            }
            Monster::Highdra => "high-dra".to_string(),
            Monster::Pirate { threshold: 2 } => "birate".to_string(),
            Monster::Pirate { threshold: 3 } => "trirate".to_string(),
            Monster::Pirate { .. } => "pirate".to_string(),
            Monster::CobbleGoblin => "cobble goblin".to_string(),
            Monster::PrimeGoblin => "prime goblin".to_string(),
            Monster::GelatinousSquare => "gelatinous square".to_string(),
            Monster::GelatinousCube => "gelatinous cube".to_string(),
            Monster::Foocubus { inc: true } => "inc-ubus".to_string(),
            Monster::Foocubus { inc: false } => "succ-ubus".to_string(),
        }
    }

    /// Rules line followed by lore, shown in the info panel
    pub fn blurb(&self) -> String {
        match *self {
            Monster::Modron { rank } => {
                let rule = if rank == 1 {
                    "Defeated by any number.".to_string()
                } else {
                    format!("Defeated by multiples of {rank}.")
                };
                let lore = (rank as usize)
                    .checked_sub(1)
                    .and_then(|i| MODRON_LORE.get(i))
                    .copied()
                    .unwrap_or("");
                format!("{rule}\n\n{lore}")
            }
            Monster::Dragon { heads } => {
                let mut blurb = format!(
                    "Defeated by the number {heads}.\n\nDragonologists INSIST on calling garden-variety dragons \"one-headed dragons.\" Dragonologists are no fun at parties."
                );
                if heads != 1 {
                    blurb.push_str("\n\nEach of the dragon's heads is in a fierce custody battle for all the other heads, so only one is allowed to appear onscreen at a time.");
                }
                blurb
            }
            Monster::Highdra => "Defeated by your highest die.\n\nThe high-dra is a cousin to the pi-dra. Pi-dras were hunted to extinction in 754 I.E. after people got sick of dealing with the points they left floating everywhere.".to_string(),
            Monster::Pirate { threshold } => format!(
                "Defeated by a number you have {threshold} or more of.\n\nMost pirates were driven out of work during 754 I.E. Interestingly enough, although pirates were human, birates and trirates are fungi that perfectly resemble humans."
            ),
            Monster::CobbleGoblin => "Defeated by composite numbers. 1 is not composite.\n\nIt's this little goblin's first day on dungeon duty, and all it could find was this patchy armor. It barely fits, and it lets composite numbers straight through. Poor thing.".to_string(),
            Monster::PrimeGoblin => "Defeated by prime numbers. 1 is not prime.\n\nThe goblins never agreed on what to do with the number 1, given most of them can't count much higher.".to_string(),
            Monster::GelatinousSquare => "Defeated by square numbers.\n\nJust a plane ol' gelatinous square.".to_string(),
            Monster::GelatinousCube => "Defeated by cubic numbers.\n\nGelatinous cubes were once farmed for a \"cruelty-free\" gelatin. Business went remarkably well until the farmers were dissolved by their livestock.".to_string(),
            Monster::Foocubus { inc } => format!(
                "Defeated by a number one {} than another number you rolled.\n\nInc-ubi and succ-ubi are actually the same creature in different moods.",
                if inc { "more" } else { "less" }
            ),
        }
    }

    /// Targets for the narrative log
    pub fn body_parts(&self) -> &'static [&'static str] {
        match self {
            Monster::Modron { .. } => &["chassis", "core", "gears", "wing", "antenna", "plating"],
            Monster::Dragon { .. } => &["eye", "head", "heart", "wing", "neck"],
            Monster::Highdra => &["head", "other head", "other other head"],
            Monster::Pirate { .. } => &["eye patch", "hook hand", "peg leg", "grog"],
            Monster::CobbleGoblin | Monster::PrimeGoblin => &["leg", "arm", "head", "nose", "hat"],
            Monster::GelatinousSquare => &["gel", "gelatin", "corner", "edge"],
            Monster::GelatinousCube => &["gel", "gelatin", "corner", "edge", "face"],
            Monster::Foocubus { .. } => &["wing", "horn", "tail"],
        }
    }

    pub fn sprite(&self) -> Sprite {
        match *self {
            Monster::Modron { rank } => Sprite::Modron(rank.clamp(1, 5)),
            Monster::Dragon { .. } => Sprite::Dragon,
            Monster::Highdra => Sprite::Highdra,
            Monster::Pirate { .. } => Sprite::Pirate,
            Monster::CobbleGoblin => Sprite::CobbleGoblin,
            Monster::PrimeGoblin => Sprite::GoblinLord,
            Monster::GelatinousSquare => Sprite::GelatinousSquare,
            Monster::GelatinousCube => Sprite::GelatinousCube,
            Monster::Foocubus { .. } => Sprite::Demon,
        }
    }
}

const MODRON_NAMES: [&str; 5] = ["monodron", "duodron", "tridron", "quadron", "pentadron"];

const HEAD_COUNTS: [&str; 11] = [
    "zero?!", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

const MODRON_LORE: [&str; 5] = [
    "These foot soldiers of Primus' army are so brittle, any value will defeat them. Such is the fate of fodder.",
    "Primus' priests hold that when a higher-ranking modron dies, a modron of the rank below somewhere in the multiverse becomes a rank higher in a puff of smoke. No one has ever actually seen this happen.",
    "Legend has it that the various arities of modron do not get any stronger. They simply acquire a taste for more exotic numbers as their processors get more sophisticated.",
    "Quadrons are the lowest rank of modron with the ability to speak. They spend much of this newfound power griping about how much they hate being called quadcopters.",
    "As the popular jumprope rhyme goes: \"Five, Ten, Fifteen, Twenty. Never leave the-- OH GOD A PENTADRON RUN\"",
];

pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Whether `n` is some integer raised to `exp`
fn is_perfect_power(n: u32, exp: u32) -> bool {
    (1..=n).take_while(|b| b.pow(exp) <= n).any(|b| b.pow(exp) == n)
}
