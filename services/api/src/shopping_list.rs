//! Shopping list built from the recipes in a user's cart
//!
//! Ingredients are merged by their display identity, the `(name, unit)`
//! pair, not by row id: two catalogue rows spelled the same way end up on
//! one line. Lines keep the order in which each identity was first seen.

use std::{collections::HashMap, fmt};

use sqlx::FromRow;

pub const HEADER: &str = "Список покупок:";
pub const FOOTER: &str = " Foodgram ©";

/// One ingredient line with its summed amount
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Merge items sharing a `(name, unit)` identity, summing their amounts
    pub fn from_items(items: impl IntoIterator<Item = ShoppingListItem>) -> Self {
        let mut merged: Vec<ShoppingListItem> = Vec::new();
        let mut positions: HashMap<(String, String), usize> = HashMap::new();

        for item in items {
            let key = (item.name.clone(), item.measurement_unit.clone());
            match positions.get(&key) {
                Some(&index) => merged[index].total_amount += item.total_amount,
                None => {
                    positions.insert(key, merged.len());
                    merged.push(item);
                }
            }
        }

        Self { items: merged }
    }

    /// Plain-text document offered for download
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ShoppingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", HEADER)?;
        for (index, item) in self.items.iter().enumerate() {
            writeln!(
                f,
                "{}. {}, {} - {}",
                index + 1,
                item.name,
                item.measurement_unit,
                item.total_amount
            )?;
        }
        write!(f, "\n\n{}", FOOTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, measurement_unit: &str, total_amount: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            measurement_unit: measurement_unit.to_string(),
            total_amount,
        }
    }

    #[test]
    fn test_merges_across_recipes_in_first_seen_order() {
        // Recipe A: flour 200 g, sugar 100 g. Recipe B: flour 300 g, eggs 2 pcs.
        let list = ShoppingList::from_items([
            item("Flour", "g", 200),
            item("Sugar", "g", 100),
            item("Flour", "g", 300),
            item("Egg", "pcs", 2),
        ]);

        assert_eq!(
            list.items,
            vec![
                item("Flour", "g", 500),
                item("Sugar", "g", 100),
                item("Egg", "pcs", 2),
            ]
        );
        assert_eq!(
            list.render(),
            "Список покупок:\n1. Flour, g - 500\n2. Sugar, g - 100\n3. Egg, pcs - 2\n\n\n Foodgram ©"
        );
    }

    #[test]
    fn test_same_name_different_unit_stays_separate() {
        let list = ShoppingList::from_items([
            item("Milk", "ml", 200),
            item("Milk", "cup", 1),
            item("Milk", "ml", 50),
        ]);

        assert_eq!(
            list.items,
            vec![
                item("Milk", "ml", 250),
                item("Milk", "cup", 1),
            ]
        );
    }

    #[test]
    fn test_empty_cart_renders_header_and_footer_only() {
        let list = ShoppingList::from_items(Vec::new());

        assert!(list.items.is_empty());
        assert_eq!(list.render(), "Список покупок:\n\n\n Foodgram ©");
    }

    #[test]
    fn test_order_is_not_alphabetical() {
        let list = ShoppingList::from_items([
            item("Zucchini", "pcs", 1),
            item("Apple", "pcs", 3),
        ]);

        let rendered = list.render();
        let zucchini = rendered.find("Zucchini").unwrap();
        let apple = rendered.find("Apple").unwrap();
        assert!(zucchini < apple);
        assert!(rendered.contains("1. Zucchini, pcs - 1\n2. Apple, pcs - 3\n"));
    }
}
