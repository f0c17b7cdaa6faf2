//! Inventory items

use serde::{Deserialize, Serialize};

use super::die_mod::DieMod;
use crate::assets::Sprite;

/// What an item does when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Mount a modifier on a die
    Equip(DieMod),
    /// Move one used die back to ready
    RestoreOne,
    /// Move every used die back to ready
    RestoreAll,
    /// Reroll one die
    RerollOne,
    /// Reroll every ready die
    RerollAll,
}

impl ItemKind {
    /// Whether activating the item waits for a target die
    pub fn needs_target(&self) -> bool {
        matches!(self, ItemKind::Equip(_) | ItemKind::RestoreOne | ItemKind::RerollOne)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
}

impl Item {
    pub fn healing_potion() -> Self {
        Self {
            kind: ItemKind::RestoreOne,
        }
    }

    pub fn greater_healing_potion() -> Self {
        Self {
            kind: ItemKind::RestoreAll,
        }
    }

    pub fn luck_potion() -> Self {
        Self {
            kind: ItemKind::RerollOne,
        }
    }

    pub fn greater_luck_potion() -> Self {
        Self {
            kind: ItemKind::RerollAll,
        }
    }

    pub fn equipment(die_mod: DieMod) -> Self {
        Self {
            kind: ItemKind::Equip(die_mod),
        }
    }

    pub fn name(&self) -> String {
        match &self.kind {
            ItemKind::Equip(m) => m.name(),
            ItemKind::RestoreOne => "healing potion".to_string(),
            ItemKind::RestoreAll => "greater healing potion".to_string(),
            ItemKind::RerollOne => "luck potion".to_string(),
            ItemKind::RerollAll => "greater luck potion".to_string(),
        }
    }

    /// Label drawn under the inventory slot
    pub fn short(&self) -> String {
        match &self.kind {
            ItemKind::Equip(m) => m.short(),
            ItemKind::RestoreOne => "♥1".to_string(),
            ItemKind::RestoreAll => "♥A".to_string(),
            ItemKind::RerollOne => "§1".to_string(),
            ItemKind::RerollAll => "§A".to_string(),
        }
    }

    pub fn description(&self) -> String {
        match &self.kind {
            ItemKind::Equip(m) => format!("Equipment. {}\n\n{}", m.description(), m.flavor()),
            ItemKind::RestoreOne => "Restores a single die.".to_string(),
            ItemKind::RestoreAll => "Restores all your dice.".to_string(),
            ItemKind::RerollOne => "Rerolls a single die.".to_string(),
            ItemKind::RerollAll => "Rerolls all your dice.".to_string(),
        }
    }

    pub fn sprite(&self) -> Sprite {
        match &self.kind {
            ItemKind::Equip(m) => m.sprite(),
            ItemKind::RestoreOne => Sprite::PotionHealing,
            ItemKind::RestoreAll => Sprite::PotionHealingGreater,
            ItemKind::RerollOne => Sprite::PotionLuck,
            ItemKind::RerollAll => Sprite::PotionLuckGreater,
        }
    }
}
