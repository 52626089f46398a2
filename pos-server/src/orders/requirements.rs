//! Ingredient requirements of a whole order
//!
//! Per-line recipe consumption is summed per ingredient so that an ingredient
//! shared by two products is checked once, against the combined amount.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::RecipeIngredient;

use super::money::{to_decimal, to_stock};

/// Total demand for one ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
}

impl Requirement {
    /// Demand at stock precision, the amount actually checked and debited
    pub fn required(&self) -> f64 {
        to_stock(self.quantity)
    }
}

/// Ingredient id → total demand, iterated in ascending id order
#[derive(Debug, Clone, Default)]
pub struct Requirements {
    by_ingredient: BTreeMap<i64, Requirement>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the consumption of `line_quantity` units of a product
    pub fn add_line(&mut self, recipe: &[RecipeIngredient], line_quantity: i64) {
        for ingredient in recipe {
            let needed = to_decimal(ingredient.quantity) * Decimal::from(line_quantity);
            self.by_ingredient
                .entry(ingredient.inventory_item_id)
                .and_modify(|r| r.quantity += needed)
                .or_insert_with(|| Requirement {
                    name: ingredient.ingredient_name.clone(),
                    unit: ingredient.unit.clone(),
                    quantity: needed,
                });
        }
    }

    /// Non-zero requirements in ascending ingredient id order
    ///
    /// Debiting in a fixed order keeps concurrent orders from interleaving
    /// their row updates differently.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &Requirement)> {
        self.by_ingredient
            .iter()
            .filter(|(_, r)| !r.quantity.is_zero())
            .map(|(id, r)| (*id, r))
    }

    pub fn get(&self, ingredient_id: i64) -> Option<&Requirement> {
        self.by_ingredient.get(&ingredient_id)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(id: i64, name: &str, quantity: f64) -> RecipeIngredient {
        RecipeIngredient {
            inventory_item_id: id,
            ingredient_name: name.into(),
            unit: "ml".into(),
            quantity,
        }
    }

    #[test]
    fn test_shared_ingredient_is_summed() {
        let latte = vec![ingredient(1, "Milk", 200.0), ingredient(2, "Espresso", 1.0)];
        let cappuccino = vec![ingredient(1, "Milk", 120.0), ingredient(2, "Espresso", 2.0)];

        let mut req = Requirements::new();
        req.add_line(&latte, 2);
        req.add_line(&cappuccino, 3);

        assert_eq!(req.len(), 2);
        assert_eq!(req.get(1).unwrap().quantity, Decimal::from(760));
        assert_eq!(req.get(2).unwrap().quantity, Decimal::from(8));
    }

    #[test]
    fn test_no_recipe_no_requirement() {
        let mut req = Requirements::new();
        req.add_line(&[], 5);
        assert!(req.is_empty());
    }

    #[test]
    fn test_iterates_in_id_order() {
        let mut req = Requirements::new();
        req.add_line(&[ingredient(9, "Sugar", 1.0), ingredient(3, "Milk", 1.0)], 1);
        req.add_line(&[ingredient(5, "Cocoa", 1.0)], 1);
        let ids: Vec<i64> = req.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![3, 5, 9]);
    }

    #[test]
    fn test_required_is_rounded_to_stock_precision() {
        let mut req = Requirements::new();
        req.add_line(&[ingredient(1, "Syrup", 0.0007)], 2);
        let syrup = req.get(1).unwrap();
        assert_eq!(syrup.quantity, Decimal::new(14, 4));
        assert_eq!(syrup.required(), 0.001);
        assert_eq!(syrup.name, "Syrup");
        assert_eq!(syrup.unit, "ml");
    }

    #[test]
    fn test_fractional_quantities_stay_exact() {
        let mut req = Requirements::new();
        req.add_line(&[ingredient(1, "Beans", 0.1)], 3);
        assert_eq!(req.get(1).unwrap().quantity, Decimal::new(3, 1));
    }
}
