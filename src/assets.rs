//! Logical asset names
//!
//! Game code refers to art and sound only through these enums. The platform
//! layer maps them to files and owns the loaded handles.

/// Images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    /// Modron of the given rank (1-5)
    Modron(u8),
    Dragon,
    Highdra,
    Pirate,
    CobbleGoblin,
    GoblinLord,
    GelatinousSquare,
    GelatinousCube,
    Demon,
    TreasureChest,
    /// Strip of die faces, one column per `Sides`
    DiceAtlas,
    ModronCore,
    HighdraHead,
    Doubloon,
    Trebloon,
    DemonPart,
    PotionHealing,
    PotionHealingGreater,
    PotionLuck,
    PotionLuckGreater,
}

impl Sprite {
    pub const ALL: [Sprite; 24] = [
        Sprite::Modron(1),
        Sprite::Modron(2),
        Sprite::Modron(3),
        Sprite::Modron(4),
        Sprite::Modron(5),
        Sprite::Dragon,
        Sprite::Highdra,
        Sprite::Pirate,
        Sprite::CobbleGoblin,
        Sprite::GoblinLord,
        Sprite::GelatinousSquare,
        Sprite::GelatinousCube,
        Sprite::Demon,
        Sprite::TreasureChest,
        Sprite::DiceAtlas,
        Sprite::ModronCore,
        Sprite::HighdraHead,
        Sprite::Doubloon,
        Sprite::Trebloon,
        Sprite::DemonPart,
        Sprite::PotionHealing,
        Sprite::PotionHealingGreater,
        Sprite::PotionLuck,
        Sprite::PotionLuckGreater,
    ];

    /// File stem under `assets/textures/`
    pub fn file_stem(&self) -> &'static str {
        match self {
            Sprite::Modron(1) => "monodron",
            Sprite::Modron(2) => "duodron",
            Sprite::Modron(3) => "tridron",
            Sprite::Modron(4) => "quadron",
            Sprite::Modron(_) => "pentadron",
            Sprite::Dragon => "dragon",
            Sprite::Highdra => "highdra",
            Sprite::Pirate => "pirate",
            Sprite::CobbleGoblin => "cobble_goblin",
            Sprite::GoblinLord => "goblin_lord",
            Sprite::GelatinousSquare => "gelatinous_square",
            Sprite::GelatinousCube => "gelatinous_cube",
            Sprite::Demon => "demon",
            Sprite::TreasureChest => "treasure_chest",
            Sprite::DiceAtlas => "dice",
            Sprite::ModronCore => "modron_core",
            Sprite::HighdraHead => "highdra_head",
            Sprite::Doubloon => "doubloon",
            Sprite::Trebloon => "trebloon",
            Sprite::DemonPart => "demon_part",
            Sprite::PotionHealing => "potion_healing",
            Sprite::PotionHealingGreater => "potion_healing2",
            Sprite::PotionLuck => "potion_luck",
            Sprite::PotionLuckGreater => "potion_luck2",
        }
    }

    pub fn url(&self) -> String {
        format!("assets/textures/{}.png", self.file_stem())
    }
}

/// Audio clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    BgMusic,
    ModronEnter,
    ModronDie,
    ModronWin,
    DragonEnter,
    DragonDie,
    DragonWin,
    PirateEnter,
    PirateDie,
    PirateWin,
    GoblinEnter,
    GoblinDie,
    GoblinWin,
    GelatinEnter,
    GelatinDie,
    GelatinWin,
    DemonEnter,
    DemonDie,
    DemonWin,
    DiceRoll,
}

impl Sound {
    pub const ALL: [Sound; 20] = [
        Sound::BgMusic,
        Sound::ModronEnter,
        Sound::ModronDie,
        Sound::ModronWin,
        Sound::DragonEnter,
        Sound::DragonDie,
        Sound::DragonWin,
        Sound::PirateEnter,
        Sound::PirateDie,
        Sound::PirateWin,
        Sound::GoblinEnter,
        Sound::GoblinDie,
        Sound::GoblinWin,
        Sound::GelatinEnter,
        Sound::GelatinDie,
        Sound::GelatinWin,
        Sound::DemonEnter,
        Sound::DemonDie,
        Sound::DemonWin,
        Sound::DiceRoll,
    ];

    /// File stem under `assets/audio/`
    pub fn file_stem(&self) -> &'static str {
        match self {
            Sound::BgMusic => "punch_card_blues",
            Sound::ModronEnter => "modron_enter",
            Sound::ModronDie => "modron_die",
            Sound::ModronWin => "modron_win",
            Sound::DragonEnter => "dragon_enter",
            Sound::DragonDie => "dragon_die",
            Sound::DragonWin => "dragon_win",
            Sound::PirateEnter => "pirate_enter",
            Sound::PirateDie => "pirate_die",
            Sound::PirateWin => "pirate_win",
            Sound::GoblinEnter => "goblin_enter",
            Sound::GoblinDie => "goblin_die",
            Sound::GoblinWin => "goblin_win",
            Sound::GelatinEnter => "gelatin_enter",
            Sound::GelatinDie => "gelatin_die",
            Sound::GelatinWin => "gelatin_win",
            Sound::DemonEnter => "demon_enter",
            Sound::DemonDie => "demon_die",
            Sound::DemonWin => "demon_win",
            Sound::DiceRoll => "dice_roll",
        }
    }

    pub fn url(&self) -> String {
        format!("assets/audio/{}.ogg", self.file_stem())
    }
}
