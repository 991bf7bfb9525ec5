//! Equipped-item state and effect aggregation.
//!
//! The host tracks what each player wears so that query operations can
//! answer "how much of effect X is active" without the caller walking the
//! tables itself.

use serde::{Deserialize, Serialize};

/// One rolled effect on an equipped item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveEffect {
    pub effect_type: String,
    pub value: f64,
}

impl ActiveEffect {
    pub fn new(effect_type: impl Into<String>, value: f64) -> Self {
        Self {
            effect_type: effect_type.into(),
            value,
        }
    }
}

/// An item a player currently wears.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquippedItem {
    pub item_id: String,
    pub legendary_id: Option<String>,
    pub set_id: Option<String>,
    pub effects: Vec<ActiveEffect>,
}

/// Everything one player has equipped.
#[derive(Debug, Clone, Default)]
pub struct EquipmentView {
    items: Vec<EquippedItem>,
}

impl EquipmentView {
    pub fn equip(&mut self, item: EquippedItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[EquippedItem] {
        &self.items
    }

    /// Sum of all values of one effect type across equipped items, scaled.
    pub fn total_effect_value(&self, effect_type: &str, scale: f64) -> f64 {
        self.items
            .iter()
            .flat_map(|item| &item.effects)
            .filter(|effect| effect.effect_type == effect_type)
            .map(|effect| effect.value)
            .sum::<f64>()
            * scale
    }

    /// Like [`EquipmentView::total_effect_value`], restricted to one worn
    /// item. An item id that is not equipped contributes zero.
    pub fn total_effect_value_for_item(
        &self,
        item_id: &str,
        effect_type: &str,
        scale: f64,
    ) -> f64 {
        self.items
            .iter()
            .filter(|item| item.item_id == item_id)
            .flat_map(|item| &item.effects)
            .filter(|effect| effect.effect_type == effect_type)
            .map(|effect| effect.value)
            .sum::<f64>()
            * scale
    }

    /// Worn set ids with their piece counts.
    pub fn worn_sets(&self) -> Vec<(String, i64)> {
        let mut counts: Vec<(String, i64)> = Vec::new();
        for item in &self.items {
            let Some(set_id) = item.set_id.as_deref() else {
                continue;
            };
            match counts.iter_mut().find(|(id, _)| id == set_id) {
                Some((_, count)) => *count += 1,
                None => counts.push((set_id.to_string(), 1)),
            }
        }
        counts
    }

    /// Whether the effect is present at all, and at what total value.
    pub fn has_active_effect(&self, effect_type: &str) -> (bool, f64) {
        let total = self.total_effect_value(effect_type, 1.0);
        let present = self
            .items
            .iter()
            .flat_map(|item| &item.effects)
            .any(|effect| effect.effect_type == effect_type);
        (present, total)
    }

    /// All active effects, optionally restricted to one effect type.
    pub fn active_effects(&self, filter: Option<&str>) -> Vec<ActiveEffect> {
        self.items
            .iter()
            .flat_map(|item| item.effects.iter())
            .filter(|effect| filter.map_or(true, |wanted| effect.effect_type == wanted))
            .cloned()
            .collect()
    }

    /// Whether the given legendary item id is worn.
    pub fn has_legendary_item(&self, legendary_id: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.legendary_id.as_deref() == Some(legendary_id))
    }

    /// Whether any piece of the given set is worn, and how many pieces.
    pub fn has_legendary_set(&self, set_id: &str) -> (bool, i64) {
        let count = self
            .items
            .iter()
            .filter(|item| item.set_id.as_deref() == Some(set_id))
            .count() as i64;
        (count > 0, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> EquipmentView {
        let mut view = EquipmentView::default();
        view.equip(EquippedItem {
            item_id: "sword_rune".to_string(),
            legendary_id: Some("frost_reaver".to_string()),
            set_id: Some("wolf_pack".to_string()),
            effects: vec![
                ActiveEffect::new("modify_frost", 10.0),
                ActiveEffect::new("modify_armor", 4.0),
            ],
        });
        view.equip(EquippedItem {
            item_id: "cape_wolf".to_string(),
            set_id: Some("wolf_pack".to_string()),
            effects: vec![ActiveEffect::new("modify_frost", 5.0)],
            ..EquippedItem::default()
        });
        view
    }

    #[test]
    fn test_total_effect_value_sums_and_scales() {
        let view = view();
        assert_eq!(view.total_effect_value("modify_frost", 1.0), 15.0);
        assert_eq!(view.total_effect_value("modify_frost", 0.01), 0.15);
        assert_eq!(view.total_effect_value("modify_fire", 1.0), 0.0);
    }

    #[test]
    fn test_has_active_effect() {
        let view = view();
        assert_eq!(view.has_active_effect("modify_armor"), (true, 4.0));
        assert_eq!(view.has_active_effect("modify_fire"), (false, 0.0));
    }

    #[test]
    fn test_active_effects_filter() {
        let view = view();
        assert_eq!(view.active_effects(None).len(), 3);
        let frost = view.active_effects(Some("modify_frost"));
        assert_eq!(frost.len(), 2);
        assert!(frost.iter().all(|e| e.effect_type == "modify_frost"));
    }

    #[test]
    fn test_item_scoped_total_ignores_other_items() {
        let view = view();
        assert_eq!(
            view.total_effect_value_for_item("sword_rune", "modify_frost", 1.0),
            10.0
        );
        assert_eq!(
            view.total_effect_value_for_item("cape_wolf", "modify_frost", 2.0),
            10.0
        );
        assert_eq!(
            view.total_effect_value_for_item("helm_iron", "modify_frost", 1.0),
            0.0
        );
    }

    #[test]
    fn test_worn_sets_counts_pieces() {
        let view = view();
        assert_eq!(view.worn_sets(), vec![("wolf_pack".to_string(), 2)]);
        assert!(EquipmentView::default().worn_sets().is_empty());
    }

    #[test]
    fn test_legendary_queries() {
        let view = view();
        assert!(view.has_legendary_item("frost_reaver"));
        assert!(!view.has_legendary_item("storm_caller"));
        assert_eq!(view.has_legendary_set("wolf_pack"), (true, 2));
        assert_eq!(view.has_legendary_set("bear_clan"), (false, 0));
    }
}
