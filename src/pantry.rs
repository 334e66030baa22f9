use crate::category::{category_list, CategoryClassifier, CategoryFilter, CategoryLabel};
use crate::models::PantryItem;

/// Outcome of a quantity change on one pantry item.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityChange {
    Updated { id: u64, quantity: f64 },
    /// The quantity fell to zero or below, so the item left the pantry.
    Removed(PantryItem),
    NotFound,
}

/// Local snapshot of one user's pantry.
///
/// Items always hold a positive quantity. Category information is derived
/// on demand from the current items, never cached.
#[derive(Debug, Clone, Default)]
pub struct Pantry {
    items: Vec<PantryItem>,
}

impl Pantry {
    pub fn new(items: Vec<PantryItem>) -> Self {
        let mut pantry = Self::default();
        for item in items {
            pantry.add(item);
        }
        pantry
    }

    pub fn items(&self) -> &[PantryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an item, replacing any item with the same id. Items without a
    /// positive quantity are rejected.
    pub fn add(&mut self, item: PantryItem) -> bool {
        if item.quantity <= 0.0 || item.quantity.is_nan() {
            log::warn!(
                "Ignoring pantry item {} with non-positive quantity {}",
                item.id,
                item.quantity
            );
            return false;
        }

        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        true
    }

    pub fn remove(&mut self, id: u64) -> Option<PantryItem> {
        let position = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(position))
    }

    /// Applies `delta`. A result that is not a positive number (including
    /// NaN) removes the item.
    pub fn change_quantity(&mut self, id: u64, delta: f64) -> QuantityChange {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return QuantityChange::NotFound;
        };

        let quantity = item.quantity + delta;
        if quantity <= 0.0 || quantity.is_nan() {
            return match self.remove(id) {
                Some(removed) => QuantityChange::Removed(removed),
                None => QuantityChange::NotFound,
            };
        }

        item.quantity = quantity;
        QuantityChange::Updated { id, quantity }
    }

    pub fn category_of(&self, classifier: &CategoryClassifier, item: &PantryItem) -> CategoryLabel {
        classifier.classify(item.display_name())
    }

    /// "ALL" followed by each category present in the pantry.
    pub fn categories(&self, classifier: &CategoryClassifier) -> Vec<CategoryFilter> {
        category_list(self.items.iter().map(|item| self.category_of(classifier, item)))
    }

    pub fn items_in(
        &self,
        classifier: &CategoryClassifier,
        filter: CategoryFilter,
    ) -> Vec<&PantryItem> {
        self.items
            .iter()
            .filter(|item| filter.matches(self.category_of(classifier, item)))
            .collect()
    }
}
