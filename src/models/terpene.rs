// src/models/terpene.rs
use serde::{Deserialize, Serialize};

pub const TERPENE_NAMES: [&str; 14] = [
    "Gas", "Floral", "Earthy", "Fruity", "Chem", "Grapes", "Candy", "Lemons", "Lime", "Tangie",
    "Peaches", "Skunk", "Jack", "Pine",
];

pub const PROFILE_CAP: u8 = 100;

/// Nose intensity plus the fourteen terpene weights.
/// The weights share one 100% budget: moving a slider is capped by what the others already use.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TerpeneProfile {
    pub overall_strength: u8,
    values: [u8; 14],
}

impl TerpeneProfile {
    pub fn from_values(overall_strength: u8, values: [u8; 14]) -> Self {
        let mut profile = TerpeneProfile {
            overall_strength: overall_strength.min(PROFILE_CAP),
            values: [0; 14],
        };
        // Stored rows can predate the cap; replay them through it.
        for (index, value) in values.iter().enumerate() {
            profile.set_index(index, *value);
        }
        profile
    }

    pub fn index_of(name: &str) -> Option<usize> {
        TERPENE_NAMES.iter().position(|n| *n == name)
    }

    pub fn get(&self, name: &str) -> u8 {
        Self::index_of(name).map(|i| self.values[i]).unwrap_or(0)
    }

    pub fn values(&self) -> &[u8; 14] {
        &self.values
    }

    /// Sets one weight, clamped so the total stays within 100. Returns the stored value.
    pub fn set(&mut self, name: &str, value: i32) -> u8 {
        match Self::index_of(name) {
            Some(index) => self.set_index(index, value.clamp(0, PROFILE_CAP as i32) as u8),
            None => 0,
        }
    }

    fn set_index(&mut self, index: usize, value: u8) -> u8 {
        let others: u16 = self
            .values
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, v)| *v as u16)
            .sum();
        let max_allowed = (PROFILE_CAP as u16).saturating_sub(others) as u8;
        let stored = value.min(max_allowed);
        self.values[index] = stored;
        stored
    }

    pub fn set_strength(&mut self, value: i32) {
        self.overall_strength = value.clamp(0, PROFILE_CAP as i32) as u8;
    }

    pub fn total(&self) -> u16 {
        self.values.iter().map(|v| *v as u16).sum()
    }

    pub fn remaining(&self) -> u8 {
        (PROFILE_CAP as u16).saturating_sub(self.total()) as u8
    }

    /// Short label shown on the profile button.
    pub fn summary(&self) -> String {
        let mut non_zero: Vec<(&str, u8)> = TERPENE_NAMES
            .iter()
            .zip(self.values.iter())
            .filter(|(_, v)| **v > 0)
            .map(|(n, v)| (*n, *v))
            .collect();
        if non_zero.is_empty() {
            return if self.overall_strength == 0 {
                "Not Set".to_string()
            } else {
                format!("Strength: {}%", self.overall_strength)
            };
        }
        // Stable sort keeps list order among equal weights.
        non_zero.sort_by(|a, b| b.1.cmp(&a.1));
        non_zero
            .iter()
            .take(2)
            .map(|(n, _)| *n)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_is_capped_by_the_others() {
        let mut profile = TerpeneProfile::default();
        assert_eq!(profile.set("Floral", 40), 40);
        assert_eq!(profile.set("Earthy", 30), 30);
        assert_eq!(profile.set("Gas", 80), 30);
        assert_eq!(profile.get("Gas"), 30);
        assert_eq!(profile.total(), 100);
        assert_eq!(profile.remaining(), 0);
    }

    #[test]
    fn total_never_exceeds_cap_over_any_sequence() {
        let mut profile = TerpeneProfile::default();
        let moves = [
            ("Gas", 55), ("Pine", 70), ("Jack", 100), ("Gas", 10), ("Pine", 95),
            ("Lime", 5), ("Candy", 65), ("Gas", 100), ("Skunk", -20), ("Tangie", 300),
        ];
        for (name, value) in moves {
            profile.set(name, value);
            assert!(profile.total() <= 100, "total {} after {} -> {}", profile.total(), name, value);
        }
    }

    #[test]
    fn lowering_a_value_always_succeeds() {
        let mut profile = TerpeneProfile::default();
        profile.set("Gas", 100);
        assert_eq!(profile.set("Gas", 35), 35);
        assert_eq!(profile.remaining(), 65);
    }

    #[test]
    fn out_of_range_and_unknown_inputs() {
        let mut profile = TerpeneProfile::default();
        assert_eq!(profile.set("Chem", -5), 0);
        assert_eq!(profile.set("Chem", 250), 100);
        assert_eq!(profile.set("Basil", 20), 0);
        assert_eq!(profile.get("Basil"), 0);
    }

    #[test]
    fn stored_values_are_replayed_through_the_cap() {
        let mut values = [0u8; 14];
        values[0] = 70;
        values[1] = 50;
        let profile = TerpeneProfile::from_values(120, values);
        assert_eq!(profile.get("Gas"), 70);
        assert_eq!(profile.get("Floral"), 30);
        assert_eq!(profile.overall_strength, 100);
    }

    #[test]
    fn summary_text() {
        let mut profile = TerpeneProfile::default();
        assert_eq!(profile.summary(), "Not Set");

        profile.set_strength(45);
        assert_eq!(profile.summary(), "Strength: 45%");

        profile.set("Candy", 20);
        profile.set("Pine", 35);
        profile.set("Gas", 20);
        assert_eq!(profile.summary(), "Pine, Gas");
    }
}
