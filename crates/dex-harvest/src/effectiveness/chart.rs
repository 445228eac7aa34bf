//! Static type charts
//!
//! One canonical copy of both rule tables, in canonical category order.

/// How a defending category takes hits from attacking categories
#[derive(Debug)]
pub struct DefensiveEntry {
    pub category: &'static str,
    pub weak_to: &'static [&'static str],
    pub resists: &'static [&'static str],
    pub immune_to: &'static [&'static str],
}

/// How an attacking category's moves land on defending categories
#[derive(Debug)]
pub struct OffensiveEntry {
    pub category: &'static str,
    pub strong_against: &'static [&'static str],
    pub weak_against: &'static [&'static str],
    pub no_effect: &'static [&'static str],
}

pub static DEFENSIVE_CHART: [DefensiveEntry; 18] = [
    DefensiveEntry {
        category: "Normal",
        weak_to: &["Fighting"],
        resists: &[],
        immune_to: &["Ghost"],
    },
    DefensiveEntry {
        category: "Fire",
        weak_to: &["Ground", "Rock", "Water"],
        resists: &["Bug", "Steel", "Fire", "Grass", "Ice", "Fairy"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Water",
        weak_to: &["Grass", "Electric"],
        resists: &["Steel", "Fire", "Water", "Ice"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Electric",
        weak_to: &["Ground"],
        resists: &["Flying", "Steel", "Electric"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Grass",
        weak_to: &["Flying", "Poison", "Bug", "Fire", "Ice"],
        resists: &["Ground", "Water", "Grass", "Electric"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Ice",
        weak_to: &["Fighting", "Rock", "Steel", "Fire"],
        resists: &["Ice"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Fighting",
        weak_to: &["Flying", "Psychic", "Fairy"],
        resists: &["Rock", "Bug", "Dark"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Poison",
        weak_to: &["Ground", "Psychic"],
        resists: &["Fighting", "Poison", "Bug", "Grass", "Fairy"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Ground",
        weak_to: &["Water", "Grass", "Ice"],
        resists: &["Poison", "Rock"],
        immune_to: &["Electric"],
    },
    DefensiveEntry {
        category: "Flying",
        weak_to: &["Rock", "Electric", "Ice"],
        resists: &["Fighting", "Bug", "Grass"],
        immune_to: &["Ground"],
    },
    DefensiveEntry {
        category: "Psychic",
        weak_to: &["Bug", "Ghost", "Dark"],
        resists: &["Fighting", "Psychic"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Bug",
        weak_to: &["Flying", "Rock", "Fire"],
        resists: &["Fighting", "Ground", "Grass"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Rock",
        weak_to: &["Fighting", "Ground", "Steel", "Water", "Grass"],
        resists: &["Normal", "Flying", "Poison", "Fire"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Ghost",
        weak_to: &["Ghost", "Dark"],
        resists: &["Poison", "Bug"],
        immune_to: &["Normal", "Fighting"],
    },
    DefensiveEntry {
        category: "Dragon",
        weak_to: &["Ice", "Dragon", "Fairy"],
        resists: &["Fire", "Water", "Electric", "Grass"],
        immune_to: &[],
    },
    DefensiveEntry {
        category: "Dark",
        weak_to: &["Fighting", "Bug", "Fairy"],
        resists: &["Ghost", "Dark"],
        immune_to: &["Psychic"],
    },
    DefensiveEntry {
        category: "Steel",
        weak_to: &["Fighting", "Ground", "Fire"],
        resists: &[
            "Normal", "Flying", "Rock", "Bug", "Steel", "Grass", "Psychic", "Ice", "Dragon",
            "Fairy",
        ],
        immune_to: &["Poison"],
    },
    DefensiveEntry {
        category: "Fairy",
        weak_to: &["Poison", "Steel"],
        resists: &["Fighting", "Bug", "Dark"],
        immune_to: &["Dragon"],
    },
];

pub static OFFENSIVE_CHART: [OffensiveEntry; 18] = [
    OffensiveEntry {
        category: "Normal",
        strong_against: &[],
        weak_against: &["Rock", "Steel"],
        no_effect: &["Ghost"],
    },
    OffensiveEntry {
        category: "Fire",
        strong_against: &["Grass", "Ice", "Bug", "Steel"],
        weak_against: &["Fire", "Water", "Rock", "Dragon"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Water",
        strong_against: &["Fire", "Ground", "Rock"],
        weak_against: &["Water", "Grass", "Dragon"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Electric",
        strong_against: &["Water", "Flying"],
        weak_against: &["Electric", "Grass", "Dragon"],
        no_effect: &["Ground"],
    },
    OffensiveEntry {
        category: "Grass",
        strong_against: &["Water", "Ground", "Rock"],
        weak_against: &["Fire", "Grass", "Poison", "Flying", "Bug", "Dragon", "Steel"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Ice",
        strong_against: &["Grass", "Ground", "Flying", "Dragon"],
        weak_against: &["Fire", "Water", "Ice", "Steel"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Fighting",
        strong_against: &["Normal", "Ice", "Rock", "Dark", "Steel"],
        weak_against: &["Poison", "Flying", "Psychic", "Bug", "Fairy"],
        no_effect: &["Ghost"],
    },
    OffensiveEntry {
        category: "Poison",
        strong_against: &["Grass", "Fairy"],
        weak_against: &["Poison", "Ground", "Rock", "Ghost"],
        no_effect: &["Steel"],
    },
    OffensiveEntry {
        category: "Ground",
        strong_against: &["Fire", "Electric", "Poison", "Rock", "Steel"],
        weak_against: &["Grass", "Bug"],
        no_effect: &["Flying"],
    },
    OffensiveEntry {
        category: "Flying",
        strong_against: &["Electric", "Fighting", "Bug", "Grass"],
        weak_against: &["Electric", "Rock", "Steel"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Psychic",
        strong_against: &["Fighting", "Poison"],
        weak_against: &["Psychic", "Steel"],
        no_effect: &["Dark"],
    },
    OffensiveEntry {
        category: "Bug",
        strong_against: &["Grass", "Psychic", "Dark"],
        weak_against: &["Fire", "Fighting", "Poison", "Flying", "Ghost", "Steel", "Fairy"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Rock",
        strong_against: &["Fire", "Ice", "Flying", "Bug"],
        weak_against: &["Fighting", "Ground", "Steel"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Ghost",
        strong_against: &["Psychic", "Ghost"],
        weak_against: &["Dark"],
        no_effect: &["Normal"],
    },
    OffensiveEntry {
        category: "Dragon",
        strong_against: &["Dragon"],
        weak_against: &["Steel"],
        no_effect: &["Fairy"],
    },
    OffensiveEntry {
        category: "Dark",
        strong_against: &["Psychic", "Ghost"],
        weak_against: &["Fighting", "Dark", "Fairy"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Steel",
        strong_against: &["Ice", "Rock", "Fairy"],
        weak_against: &["Fire", "Water", "Electric", "Steel"],
        no_effect: &[],
    },
    OffensiveEntry {
        category: "Fairy",
        strong_against: &["Fighting", "Dragon", "Dark"],
        weak_against: &["Fire", "Poison", "Steel"],
        no_effect: &[],
    },
];

pub fn defensive(category: &str) -> Option<&'static DefensiveEntry> {
    DEFENSIVE_CHART.iter().find(|e| e.category == category)
}

pub fn offensive(category: &str) -> Option<&'static OffensiveEntry> {
    OFFENSIVE_CHART.iter().find(|e| e.category == category)
}

/// Every category the defensive chart knows, in canonical order
pub fn categories() -> impl Iterator<Item = &'static str> {
    DEFENSIVE_CHART.iter().map(|e| e.category)
}
