//! Element and modality tallies over placed signs.

use crate::western::signs::{Element, Modality, Sign};
use serde::Serialize;
use std::collections::BTreeMap;

/// Count per category; every category is present, zeros included
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Distribution<K: Ord + Serialize>(BTreeMap<K, u32>);

impl<K: Ord + Copy + Serialize> Distribution<K> {
    fn zeroed(categories: &[K]) -> Self {
        Self(categories.iter().map(|&k| (k, 0)).collect())
    }

    fn bump(&mut self, category: K) {
        *self.0.entry(category).or_insert(0) += 1;
    }

    pub fn count(&self, category: K) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &u32)> {
        self.0.iter()
    }
}

/// Tally elements across signs; `None` entries are skipped
pub fn element_distribution<'a, I>(signs: I) -> Distribution<Element>
where
    I: IntoIterator<Item = &'a Option<Sign>>,
{
    let mut dist = Distribution::zeroed(&Element::ALL);
    for sign in signs.into_iter().flatten() {
        dist.bump(sign.element());
    }
    dist
}

/// Tally modalities across signs; `None` entries are skipped
pub fn modality_distribution<'a, I>(signs: I) -> Distribution<Modality>
where
    I: IntoIterator<Item = &'a Option<Sign>>,
{
    let mut dist = Distribution::zeroed(&Modality::ALL);
    for sign in signs.into_iter().flatten() {
        dist.bump(sign.modality());
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_keeps_all_categories() {
        let signs: Vec<Option<Sign>> = vec![];
        let elements = element_distribution(&signs);
        assert_eq!(elements.iter().count(), 4);
        assert_eq!(elements.total(), 0);
        let modes = modality_distribution(&signs);
        assert_eq!(modes.iter().count(), 3);
    }

    #[test]
    fn tallies_and_skips_missing() {
        let signs = vec![Some(Sign::Aries), Some(Sign::Leo), None, Some(Sign::Cancer)];
        let elements = element_distribution(&signs);
        assert_eq!(elements.count(Element::Fire), 2);
        assert_eq!(elements.count(Element::Water), 1);
        assert_eq!(elements.count(Element::Air), 0);

        let modes = modality_distribution(&signs);
        assert_eq!(modes.count(Modality::Cardinal), 2);
        assert_eq!(modes.count(Modality::Fixed), 1);
        assert_eq!(modes.total(), 3);
    }

    #[test]
    fn serializes_in_category_order() {
        let signs = vec![Some(Sign::Pisces)];
        let json = serde_json::to_string(&element_distribution(&signs)).unwrap();
        assert_eq!(json, r#"{"Fire":0,"Earth":0,"Air":0,"Water":1}"#);
    }
}
