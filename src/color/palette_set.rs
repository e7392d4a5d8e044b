use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::color::{HexColor, to_perceptual};

/// Shades considered "mid" in a 50–950 style scale.
const MID_SHADES: std::ops::RangeInclusive<u16> = 300..=700;
/// Perceptual lightness band used when shade numbers are not informative.
const MID_LIGHTNESS: std::ops::RangeInclusive<f32> = 0.35..=0.85;

/// One entry of a palette family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteShade {
    pub shade: u16,
    pub value: HexColor,
}

/// Palette input: family name mapped to its ordered shades.
///
/// Read-only for the engine; family order is preserved as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteSet {
    families: IndexMap<String, Vec<PaletteShade>>,
}

impl PaletteSet {
    pub fn new(families: IndexMap<String, Vec<PaletteShade>>) -> Self {
        Self { families }
    }

    pub fn families(&self) -> &IndexMap<String, Vec<PaletteShade>> {
        &self.families
    }

    /// Restrict the set to a single family, if it exists.
    pub fn only(&self, family: &str) -> Option<PaletteSet> {
        self.families.get(family).map(|shades| {
            let mut families = IndexMap::new();
            families.insert(family.to_string(), shades.clone());
            PaletteSet { families }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.families.values().all(Vec::is_empty)
    }

    fn entries(&self) -> impl Iterator<Item = &PaletteShade> {
        self.families.values().flatten()
    }

    /// Candidate colors for seeding a mesh, preferring mid-luminance entries.
    ///
    /// Falls back to a lightness band and finally to every entry, so the
    /// result is empty only when the set itself is.
    pub fn mid_tones(&self) -> Vec<HexColor> {
        let by_shade: Vec<HexColor> = self
            .entries()
            .filter(|entry| MID_SHADES.contains(&entry.shade))
            .map(|entry| entry.value)
            .collect();
        if !by_shade.is_empty() {
            return by_shade;
        }

        let by_lightness: Vec<HexColor> = self
            .entries()
            .filter(|entry| MID_LIGHTNESS.contains(&to_perceptual(entry.value).l))
            .map(|entry| entry.value)
            .collect();
        if !by_lightness.is_empty() {
            return by_lightness;
        }

        self.entries().map(|entry| entry.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shade(shade: u16, value: &str) -> PaletteShade {
        PaletteShade {
            shade,
            value: HexColor::parse(value).unwrap(),
        }
    }

    fn sample() -> PaletteSet {
        let mut families = IndexMap::new();
        families.insert(
            "sky".to_string(),
            vec![
                shade(100, "#e0f2fe"),
                shade(500, "#0ea5e9"),
                shade(900, "#0c4a6e"),
            ],
        );
        families.insert(
            "rose".to_string(),
            vec![shade(300, "#fda4af"), shade(950, "#4c0519")],
        );
        PaletteSet::new(families)
    }

    #[test]
    fn mid_tones_prefer_mid_shades() {
        let tones = sample().mid_tones();
        assert_eq!(
            tones,
            vec![HexColor::parse("#0ea5e9").unwrap(), HexColor::parse("#fda4af").unwrap()]
        );
    }

    #[test]
    fn mid_tones_fall_back_to_lightness_then_everything() {
        let mut families = IndexMap::new();
        families.insert(
            "custom".to_string(),
            vec![shade(1, "#000000"), shade(2, "#3a7bd5"), shade(3, "#ffffff")],
        );
        let set = PaletteSet::new(families);
        assert_eq!(set.mid_tones(), vec![HexColor::parse("#3a7bd5").unwrap()]);

        let mut families = IndexMap::new();
        families.insert("extremes".to_string(), vec![shade(1, "#000000")]);
        assert_eq!(PaletteSet::new(families).mid_tones(), vec![HexColor::BLACK]);
    }

    #[test]
    fn only_restricts_to_family() {
        let set = sample();
        let sky = set.only("sky").unwrap();
        assert_eq!(sky.families().len(), 1);
        assert!(set.only("teal").is_none());
    }

    #[test]
    fn deserialises_family_mapping() {
        let json = r##"{"amber":[{"shade":500,"value":"#f59e0b"}]}"##;
        let set: PaletteSet = serde_json::from_str(json).unwrap();
        assert!(!set.is_empty());
        assert_eq!(set.families()["amber"][0].shade, 500);
    }
}
