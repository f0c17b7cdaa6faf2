//! Die modifiers
//!
//! Each modifier is a named transform from a raw face to the final roll.
//! Only the silver coins draw extra randomness.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::die::Sides;
use crate::assets::Sprite;

/// Coin metal, decides between multiplying and widening the die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metal {
    Silver,
    Gold,
}

impl Metal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metal::Silver => "silver",
            Metal::Gold => "gold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DieMod {
    /// Always rolls `rank`
    ModronCore { rank: u8 },
    /// Always rolls the die's highest face
    HighdraHead,
    /// Gold multiplies the roll; silver rolls as if the die had N times the sides
    Nloon { multiplier: u8, metal: Metal },
    /// Shifts the roll by one (up for the inc-ubus horn, down for the succ-ubus tail)
    DemonPart { inc: bool },
}

const NLOON_FLAVOR: &str = "Doubloons and trebloons are useless as currency, due to their tendency to mess up ledgers and accounting books.";

impl DieMod {
    /// Apply the modifier to a raw face. May go out of range; the die clamps.
    pub fn modify_roll<R: Rng + ?Sized>(&self, sides: Sides, raw: u32, rng: &mut R) -> i64 {
        match *self {
            DieMod::ModronCore { rank } => rank as i64,
            DieMod::HighdraHead => sides.count() as i64,
            DieMod::Nloon {
                multiplier,
                metal: Metal::Gold,
            } => raw as i64 * multiplier as i64,
            DieMod::Nloon {
                multiplier,
                metal: Metal::Silver,
            } => rng.random_range(1..=sides.count() * multiplier as u32) as i64,
            DieMod::DemonPart { inc: true } => raw as i64 + 1,
            DieMod::DemonPart { inc: false } => raw as i64 - 1,
        }
    }

    pub fn name(&self) -> String {
        match self {
            DieMod::ModronCore { rank } => format!("modron core {rank}"),
            DieMod::HighdraHead => "high-dra head".to_string(),
            DieMod::Nloon { multiplier, metal } => {
                format!("{} {}", metal.as_str(), coin_name(*multiplier))
            }
            DieMod::DemonPart { inc: true } => "inc-ubus horn".to_string(),
            DieMod::DemonPart { inc: false } => "succ-ubus tail".to_string(),
        }
    }

    /// Label drawn under the die
    pub fn short(&self) -> String {
        match self {
            DieMod::ModronCore { rank } => format!("={rank}"),
            DieMod::HighdraHead => "MAX".to_string(),
            DieMod::Nloon {
                multiplier,
                metal: Metal::Gold,
            } => format!("${multiplier}"),
            DieMod::Nloon {
                multiplier,
                metal: Metal::Silver,
            } => format!("½{multiplier}"),
            DieMod::DemonPart { inc: true } => "+1".to_string(),
            DieMod::DemonPart { inc: false } => "-1".to_string(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            DieMod::ModronCore { rank } => format!("Makes the die always roll {rank}."),
            DieMod::HighdraHead => "Makes the die always roll its highest possible value.".to_string(),
            DieMod::Nloon {
                multiplier,
                metal: Metal::Gold,
            } => format!("Multiplies the die roll by {multiplier}."),
            DieMod::Nloon {
                multiplier,
                metal: Metal::Silver,
            } => format!("Makes the die act as if it had {multiplier}x as many sides."),
            DieMod::DemonPart { inc: true } => "Adds 1 to the die roll.".to_string(),
            DieMod::DemonPart { inc: false } => "Subtracts 1 from the die roll.".to_string(),
        }
    }

    pub fn flavor(&self) -> &'static str {
        match self {
            DieMod::ModronCore { .. } => {
                "Due to Primus' divine influence, a modron's core suppresses probability near itself."
            }
            DieMod::HighdraHead => {
                "High-dra venom is sometimes sold in irreputable taverns for its ... strengthening effects."
            }
            DieMod::Nloon { .. } => NLOON_FLAVOR,
            DieMod::DemonPart { .. } => {
                "Still warm, and still a little smug about it."
            }
        }
    }

    pub fn sprite(&self) -> Sprite {
        match self {
            DieMod::ModronCore { .. } => Sprite::ModronCore,
            DieMod::HighdraHead => Sprite::HighdraHead,
            DieMod::Nloon { multiplier: 2, .. } => Sprite::Doubloon,
            DieMod::Nloon { .. } => Sprite::Trebloon,
            DieMod::DemonPart { .. } => Sprite::DemonPart,
        }
    }
}

fn coin_name(multiplier: u8) -> &'static str {
    match multiplier {
        2 => "doubloon",
        3 => "trebloon",
        _ => "n-bloon",
    }
}
