//! Gameplay core
//!
//! Everything that decides the outcome of a run lives here. This module is
//! pure apart from the RNG it is handed:
//! - Seeded RNG only, passed in by the caller
//! - No rendering, audio or platform dependencies
//! - One logical turn per call

pub mod class;
pub mod die;
pub mod die_mod;
pub mod item;
pub mod level;
pub mod monster;
pub mod state;
pub mod strings;

pub use class::{ClassPower, ClassType, PlayerClass};
pub use die::{Die, MAX_ROLL, MIN_ROLL, Sides};
pub use die_mod::{DieMod, Metal};
pub use item::{Item, ItemKind};
pub use level::{Level, TUTORIAL};
pub use monster::{Family, Monster};
pub use state::{
    CoverMode, DiceArena, DieId, GameEvent, GameplayState, Mode, Pool, RolledDie, RunSummary,
    TurnError, TurnOutcome,
};
