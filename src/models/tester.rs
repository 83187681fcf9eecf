// src/models/tester.rs
use crate::models::terpene::TerpeneProfile;
use serde::{Deserialize, Serialize};

/// Invitation to review one pheno, looked up by its code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TesterTag {
    pub id: String,
    pub pheno_id: String,
    pub owner_id: String,
    pub code: String,
    pub strain_name: Option<String>,
    pub pheno_number: Option<i64>,
    #[serde(default)]
    pub created_at: String,
}

impl TesterTag {
    pub fn display_name(&self) -> &str {
        match self.strain_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown Strain",
        }
    }

    pub fn pheno_label(&self) -> Option<String> {
        match self.pheno_number {
            Some(n) if n != 0 => Some(format!("PHENO-{:04}", n)),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingCategory {
    Color,
    Nose,
    BagAppeal,
    Smoothness,
    Potency,
    Flavor,
    Effects,
    Overall,
}

impl RatingCategory {
    // Display order of the ratings card.
    pub const ALL: [RatingCategory; 8] = [
        RatingCategory::Color,
        RatingCategory::Nose,
        RatingCategory::BagAppeal,
        RatingCategory::Smoothness,
        RatingCategory::Potency,
        RatingCategory::Flavor,
        RatingCategory::Effects,
        RatingCategory::Overall,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatingCategory::Color => "Color",
            RatingCategory::Nose => "Nose",
            RatingCategory::BagAppeal => "Bag Appeal",
            RatingCategory::Smoothness => "Smoothness",
            RatingCategory::Potency => "Potency",
            RatingCategory::Flavor => "Flavor",
            RatingCategory::Effects => "Effects",
            RatingCategory::Overall => "Overall",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

pub const MAX_STARS: u8 = 5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTrait {
    #[serde(rename = "purple")]
    Purple,
    #[serde(rename = "darkPurple")]
    DarkPurple,
    #[serde(rename = "forest")]
    Forest,
    #[serde(rename = "lime")]
    Lime,
}

impl ColorTrait {
    // Spectrum order, left to right.
    pub const ALL: [ColorTrait; 4] = [
        ColorTrait::Purple,
        ColorTrait::DarkPurple,
        ColorTrait::Forest,
        ColorTrait::Lime,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ColorTrait::Purple => "purple",
            ColorTrait::DarkPurple => "darkPurple",
            ColorTrait::Forest => "forest",
            ColorTrait::Lime => "lime",
        }
    }

    pub fn from_key(key: &str) -> Option<ColorTrait> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorTrait::Purple => "Light Purple",
            ColorTrait::DarkPurple => "Dark Purple",
            ColorTrait::Forest => "Forest Green",
            ColorTrait::Lime => "Lime Green",
        }
    }

    pub fn short_label(self) -> &'static str {
        self.label().split(' ').next().unwrap_or_default()
    }

    pub fn hex(self) -> &'static str {
        match self {
            ColorTrait::Purple => "#A855F7",
            ColorTrait::DarkPurple => "#3B0054",
            ColorTrait::Forest => "#006600",
            ColorTrait::Lime => "#22C55E",
        }
    }

    pub fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Colour under a click at `fraction` (0.0 = left edge) of the spectrum bar.
    pub fn at_fraction(fraction: f64) -> ColorTrait {
        let last = (Self::ALL.len() - 1) as f64;
        let index = (fraction * last).round().clamp(0.0, last) as usize;
        Self::ALL[index]
    }

    pub fn spectrum_css() -> String {
        let stops = Self::ALL.iter().map(|c| c.hex()).collect::<Vec<_>>().join(", ");
        format!("linear-gradient(to right, {})", stops)
    }
}

/// Column set shared by reads and writes of `tester_feedback`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FeedbackFields {
    pub overall_rating: Option<u8>,
    pub potency_rating: Option<u8>,
    pub flavor_rating: Option<u8>,
    pub nose_rating: Option<u8>,
    pub smoothness_rating: Option<u8>,
    pub effects_rating: Option<u8>,
    pub bag_appeal_rating: Option<u8>,
    pub color_rating: Option<u8>,
    pub review_notes: Option<String>,
    pub tester_display_name: Option<String>,
    #[serde(default)]
    pub overall_strength_pct: Option<u8>,
    #[serde(default)]
    pub nose_gas_pct: Option<u8>,
    #[serde(default)]
    pub nose_floral_pct: Option<u8>,
    #[serde(default)]
    pub nose_earthy_pct: Option<u8>,
    #[serde(default)]
    pub nose_fruity_pct: Option<u8>,
    #[serde(default)]
    pub nose_chem_pct: Option<u8>,
    #[serde(default)]
    pub nose_grapes_pct: Option<u8>,
    #[serde(default)]
    pub nose_candy_pct: Option<u8>,
    #[serde(default)]
    pub nose_lemons_pct: Option<u8>,
    #[serde(default)]
    pub nose_lime_pct: Option<u8>,
    #[serde(default)]
    pub nose_tangie_pct: Option<u8>,
    #[serde(default)]
    pub nose_peaches_pct: Option<u8>,
    #[serde(default)]
    pub nose_skunk_pct: Option<u8>,
    #[serde(default)]
    pub nose_jack_pct: Option<u8>,
    #[serde(default)]
    pub nose_pine_pct: Option<u8>,
    #[serde(default)]
    pub selected_color: Option<String>,
}

impl FeedbackFields {
    fn rating(&self, category: RatingCategory) -> Option<u8> {
        match category {
            RatingCategory::Color => self.color_rating,
            RatingCategory::Nose => self.nose_rating,
            RatingCategory::BagAppeal => self.bag_appeal_rating,
            RatingCategory::Smoothness => self.smoothness_rating,
            RatingCategory::Potency => self.potency_rating,
            RatingCategory::Flavor => self.flavor_rating,
            RatingCategory::Effects => self.effects_rating,
            RatingCategory::Overall => self.overall_rating,
        }
    }

    fn set_rating(&mut self, category: RatingCategory, value: Option<u8>) {
        let slot = match category {
            RatingCategory::Color => &mut self.color_rating,
            RatingCategory::Nose => &mut self.nose_rating,
            RatingCategory::BagAppeal => &mut self.bag_appeal_rating,
            RatingCategory::Smoothness => &mut self.smoothness_rating,
            RatingCategory::Potency => &mut self.potency_rating,
            RatingCategory::Flavor => &mut self.flavor_rating,
            RatingCategory::Effects => &mut self.effects_rating,
            RatingCategory::Overall => &mut self.overall_rating,
        };
        *slot = value;
    }

    // Same order as TERPENE_NAMES.
    fn terpene_columns(&self) -> [Option<u8>; 14] {
        [
            self.nose_gas_pct,
            self.nose_floral_pct,
            self.nose_earthy_pct,
            self.nose_fruity_pct,
            self.nose_chem_pct,
            self.nose_grapes_pct,
            self.nose_candy_pct,
            self.nose_lemons_pct,
            self.nose_lime_pct,
            self.nose_tangie_pct,
            self.nose_peaches_pct,
            self.nose_skunk_pct,
            self.nose_jack_pct,
            self.nose_pine_pct,
        ]
    }

    fn set_terpene_columns(&mut self, values: &[u8; 14]) {
        let [gas, floral, earthy, fruity, chem, grapes, candy, lemons, lime, tangie, peaches, skunk, jack, pine] =
            (*values).map(Some);
        self.nose_gas_pct = gas;
        self.nose_floral_pct = floral;
        self.nose_earthy_pct = earthy;
        self.nose_fruity_pct = fruity;
        self.nose_chem_pct = chem;
        self.nose_grapes_pct = grapes;
        self.nose_candy_pct = candy;
        self.nose_lemons_pct = lemons;
        self.nose_lime_pct = lime;
        self.nose_tangie_pct = tangie;
        self.nose_peaches_pct = peaches;
        self.nose_skunk_pct = skunk;
        self.nose_jack_pct = jack;
        self.nose_pine_pct = pine;
    }
}

/// A stored feedback row; one per (tag, tester).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TesterFeedback {
    pub id: String,
    pub tester_tag_id: String,
    pub tester_id: String,
    #[serde(flatten)]
    pub fields: FeedbackFields,
}

/// Insert body for a first-time submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub tester_tag_id: String,
    pub tester_id: String,
    #[serde(flatten)]
    pub fields: FeedbackFields,
}

/// Editable form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackDraft {
    ratings: [u8; 8],
    pub review_notes: String,
    pub terpenes: TerpeneProfile,
    pub color: Option<ColorTrait>,
}

impl FeedbackDraft {
    pub fn from_existing(existing: Option<&TesterFeedback>) -> Self {
        let Some(existing) = existing else {
            return FeedbackDraft::default();
        };
        let fields = &existing.fields;
        let mut draft = FeedbackDraft {
            review_notes: fields.review_notes.clone().unwrap_or_default(),
            terpenes: TerpeneProfile::from_values(
                fields.overall_strength_pct.unwrap_or(0),
                fields.terpene_columns().map(|v| v.unwrap_or(0)),
            ),
            color: fields.selected_color.as_deref().and_then(ColorTrait::from_key),
            ..FeedbackDraft::default()
        };
        for category in RatingCategory::ALL {
            draft.set_rating(category, fields.rating(category).unwrap_or(0));
        }
        draft
    }

    pub fn rating(&self, category: RatingCategory) -> u8 {
        self.ratings[category.index()]
    }

    pub fn set_rating(&mut self, category: RatingCategory, stars: u8) {
        self.ratings[category.index()] = stars.min(MAX_STARS);
    }

    /// Row columns for this draft. Unset ratings, notes and colour go out as null.
    pub fn to_fields(&self, display_name: &str) -> FeedbackFields {
        let mut fields = FeedbackFields {
            review_notes: Some(self.review_notes.clone()).filter(|n| !n.is_empty()),
            tester_display_name: Some(display_name.to_string()),
            overall_strength_pct: Some(self.terpenes.overall_strength),
            selected_color: self.color.map(|c| c.key().to_string()),
            ..FeedbackFields::default()
        };
        for category in RatingCategory::ALL {
            let stars = self.rating(category);
            fields.set_rating(category, Some(stars).filter(|s| *s > 0));
        }
        fields.set_terpene_columns(self.terpenes.values());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tag(strain: Option<&str>, number: Option<i64>) -> TesterTag {
        TesterTag {
            id: "tag-1".into(),
            pheno_id: "pheno-1".into(),
            owner_id: "owner-1".into(),
            code: "ABCD1234".into(),
            strain_name: strain.map(str::to_string),
            pheno_number: number,
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn tag_labels() {
        assert_eq!(tag(Some("Zkittlez"), Some(7)).display_name(), "Zkittlez");
        assert_eq!(tag(Some("Zkittlez"), Some(7)).pheno_label().as_deref(), Some("PHENO-0007"));
        assert_eq!(tag(None, None).display_name(), "Unknown Strain");
        assert_eq!(tag(Some(""), Some(0)).display_name(), "Unknown Strain");
        assert_eq!(tag(None, Some(0)).pheno_label(), None);
        assert_eq!(tag(None, Some(12345)).pheno_label().as_deref(), Some("PHENO-12345"));
    }

    #[test]
    fn color_spectrum_selection() {
        assert_eq!(ColorTrait::at_fraction(0.0), ColorTrait::Purple);
        assert_eq!(ColorTrait::at_fraction(0.2), ColorTrait::DarkPurple);
        assert_eq!(ColorTrait::at_fraction(0.5), ColorTrait::Forest);
        assert_eq!(ColorTrait::at_fraction(1.0), ColorTrait::Lime);
        assert_eq!(ColorTrait::at_fraction(-0.3), ColorTrait::Purple);
        assert_eq!(ColorTrait::at_fraction(1.7), ColorTrait::Lime);
        assert_eq!(ColorTrait::DarkPurple.short_label(), "Dark");
        assert_eq!(ColorTrait::from_key("darkPurple"), Some(ColorTrait::DarkPurple));
        assert_eq!(ColorTrait::from_key("teal"), None);
    }

    #[test]
    fn empty_draft_sends_nulls() {
        let fields = FeedbackDraft::default().to_fields("Tess");
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["overall_rating"], json!(null));
        assert_eq!(value["review_notes"], json!(null));
        assert_eq!(value["selected_color"], json!(null));
        assert_eq!(value["tester_display_name"], json!("Tess"));
        assert_eq!(value["overall_strength_pct"], json!(0));
        assert_eq!(value["nose_pine_pct"], json!(0));
    }

    #[test]
    fn draft_round_trips_through_a_stored_row() {
        let mut draft = FeedbackDraft::default();
        draft.set_rating(RatingCategory::Overall, 4);
        draft.set_rating(RatingCategory::BagAppeal, 9);
        draft.review_notes = "Loud".into();
        draft.terpenes.set("Gas", 60);
        draft.terpenes.set_strength(80);
        draft.color = Some(ColorTrait::Forest);

        let row = TesterFeedback {
            id: "fb-1".into(),
            tester_tag_id: "tag-1".into(),
            tester_id: "user-1".into(),
            fields: draft.to_fields("Tess"),
        };
        assert_eq!(row.fields.bag_appeal_rating, Some(5));
        assert_eq!(row.fields.selected_color.as_deref(), Some("forest"));

        let restored = FeedbackDraft::from_existing(Some(&row));
        assert_eq!(restored.rating(RatingCategory::Overall), 4);
        assert_eq!(restored.rating(RatingCategory::BagAppeal), 5);
        assert_eq!(restored.rating(RatingCategory::Nose), 0);
        assert_eq!(restored.review_notes, "Loud");
        assert_eq!(restored.terpenes, draft.terpenes);
        assert_eq!(restored.color, Some(ColorTrait::Forest));
    }

    #[test]
    fn stored_row_with_null_columns_deserializes() {
        let raw = json!({
            "id": "fb-9",
            "tester_tag_id": "tag-1",
            "tester_id": "user-1",
            "overall_rating": 3,
            "potency_rating": null,
            "flavor_rating": null,
            "nose_rating": null,
            "smoothness_rating": null,
            "effects_rating": null,
            "bag_appeal_rating": null,
            "color_rating": null,
            "review_notes": null,
            "tester_display_name": "Tess",
            "nose_gas_pct": null,
            "created_at": "2026-01-01T00:00:00Z"
        });
        let row: TesterFeedback = serde_json::from_value(raw).unwrap();
        let draft = FeedbackDraft::from_existing(Some(&row));
        assert_eq!(draft.rating(RatingCategory::Overall), 3);
        assert_eq!(draft.rating(RatingCategory::Potency), 0);
        assert_eq!(draft.terpenes.total(), 0);
        assert_eq!(draft.color, None);
    }

    #[test]
    fn insert_body_flattens_fields() {
        let body = NewFeedback {
            tester_tag_id: "tag-1".into(),
            tester_id: "user-1".into(),
            fields: FeedbackDraft::default().to_fields("Tess"),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["tester_tag_id"], json!("tag-1"));
        assert_eq!(value["tester_id"], json!("user-1"));
        assert!(value.get("fields").is_none());
    }
}
