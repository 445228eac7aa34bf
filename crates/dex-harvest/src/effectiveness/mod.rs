//! Type effectiveness engine
//!
//! Derives an entry's defensive sets (weaknesses, resistances, immunities)
//! and offensive sets (super effective, not very effective, no effect) from
//! its one or two categories. Pure and infallible: a category missing from
//! the charts is neutral everywhere.
//!
//! Defensive sets come out in canonical chart order, offensive sets in the
//! order categories were appended.

pub mod chart;

use dex_common::types::EffectivenessProfile;
use std::collections::HashSet;
use tracing::debug;

/// Damage multiplier of `attacking` against a single `defending` category
///
/// One of 0, 0.5, 1 or 2. Immunity wins over weakness over resistance
/// when a chart row lists the same attacker twice.
pub fn multiplier(attacking: &str, defending: &str) -> f64 {
    let Some(entry) = chart::defensive(defending) else {
        return 1.0;
    };

    if entry.immune_to.contains(&attacking) {
        0.0
    } else if entry.weak_to.contains(&attacking) {
        2.0
    } else if entry.resists.contains(&attacking) {
        0.5
    } else {
        1.0
    }
}

/// Compute the full profile for an entry's categories
pub fn profile_for(categories: &[String]) -> EffectivenessProfile {
    let (weak, resist, immune) = defensive_sets(categories);
    let (strong, not_very, no_effect) = offensive_sets(categories);

    EffectivenessProfile {
        weaknesses: in_chart_order(&weak),
        resistances: in_chart_order(&resist),
        immunities: in_chart_order(&immune),
        super_effective_against: strong,
        not_very_effective_against: not_very,
        no_effect_against: no_effect,
    }
}

type Set = HashSet<&'static str>;

fn defensive_sets(categories: &[String]) -> (Set, Set, Set) {
    let mut weak = Set::new();
    let mut resist = Set::new();
    let mut immune = Set::new();

    for category in categories {
        match chart::defensive(category) {
            Some(entry) => {
                weak.extend(entry.weak_to);
                resist.extend(entry.resists);
                immune.extend(entry.immune_to);
            },
            None => debug!(category = %category, "Unknown category treated as neutral"),
        }
    }

    // immune > resist > weak
    resist.retain(|t| !immune.contains(t));
    weak.retain(|t| !immune.contains(t) && !resist.contains(t));

    if let [first, second] = categories {
        apply_dual_override(first, second, &mut weak, &mut resist, &mut immune);
    }

    (weak, resist, immune)
}

/// Reclassify every chart category from the combined multiplier
///
/// Replaces the union result per category; a combined multiplier of exactly
/// 1 leaves the category in no defensive set. Each category lands in at most
/// one set, so a resistance never displaces a weakness.
fn apply_dual_override(
    first: &str,
    second: &str,
    weak: &mut Set,
    resist: &mut Set,
    immune: &mut Set,
) {
    for t in chart::categories() {
        let total = multiplier(t, first) * multiplier(t, second);

        weak.remove(t);
        resist.remove(t);
        immune.remove(t);

        if total > 1.0 {
            weak.insert(t);
        } else if total > 0.0 && total < 1.0 {
            resist.insert(t);
        } else if total == 0.0 {
            immune.insert(t);
        }
    }
}

fn offensive_sets(categories: &[String]) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut strong = Vec::new();
    let mut not_very = Vec::new();
    let mut no_effect = Vec::new();

    for entry in categories.iter().filter_map(|c| chart::offensive(c)) {
        append_absent(&mut strong, entry.strong_against);
        append_absent(&mut not_very, entry.weak_against);
        append_absent(&mut no_effect, entry.no_effect);
    }

    (strong, not_very, no_effect)
}

fn append_absent(target: &mut Vec<String>, values: &[&str]) {
    for value in values {
        if !target.iter().any(|v| v == value) {
            target.push((*value).to_string());
        }
    }
}

fn in_chart_order(set: &Set) -> Vec<String> {
    chart::categories()
        .filter(|c| set.contains(c))
        .map(str::to_string)
        .collect()
}
