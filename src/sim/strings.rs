//! Narrative log lines for hits and misses
//!
//! Purely cosmetic; nothing here affects the outcome of a turn.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::monster::Monster;

/// Chance the line omits the body part
const NO_BODY_PART_CHANCE: f64 = 0.2;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn body_part<R: Rng + ?Sized>(rng: &mut R, monster: &Monster) -> String {
    if rng.random::<f64>() < NO_BODY_PART_CHANCE {
        return String::new();
    }
    format!("'s {}", pick(rng, monster.body_parts()))
}

/// Line for a die that slays the monster
pub fn lethal_damage<R: Rng + ?Sized>(rng: &mut R, roll: u32, monster: &Monster) -> String {
    let verb = pick(rng, &["plunges", "swings", "crushes", "tears", "crunches"]);
    let adverb = pick(
        rng,
        &["wetly ", "satisfyingly ", "ferociously ", "critically ", "right ", "", ""],
    );
    let part = body_part(rng, monster);
    let excitement = pick(rng, &[".", ".", "!", "!!"]);
    format!(
        "Your {roll} {verb} {adverb}through the {}{part}{excitement}",
        monster.name()
    )
}

/// Line for a die that fails against the monster
pub fn non_lethal_damage<R: Rng + ?Sized>(rng: &mut R, roll: u32, monster: &Monster) -> String {
    let verb = pick(rng, &["pings", "bounces", "skitters", "flops"]);
    let prep = pick(rng, &["off", "against", "across", "away from"]);
    let adverb = pick(rng, &["pathetically ", "limply ", "anemically ", "", ""]);
    let part = body_part(rng, monster);
    let excitement = pick(rng, &[".", ".", "...", "...", " :("]);
    format!(
        "Your {roll} {adverb}{verb} {prep} the {}{part}{excitement}",
        monster.name()
    )
}
