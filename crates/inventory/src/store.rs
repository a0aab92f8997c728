//! Inventory Store: authoritative item list plus pure projections.

use std::collections::HashMap;

use restock_core::{DomainError, Entity, ItemId};

use crate::item::{Category, InventoryItem};

/// Id → item index over a borrowed item list.
///
/// Identifiers are expected to be unique. On a collision the later item wins
/// and the id is recorded in `collisions()` so callers can raise a
/// data-integrity warning.
#[derive(Debug)]
pub struct ItemLookup<'a, E: Entity = InventoryItem> {
    by_id: HashMap<&'a E::Id, &'a E>,
    collisions: Vec<E::Id>,
}

impl<'a, E: Entity> ItemLookup<'a, E> {
    pub fn get(&self, id: &E::Id) -> Option<&'a E> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn collisions(&self) -> &[E::Id] {
        &self.collisions
    }
}

/// Build an id index in O(n).
pub fn lookup_by_id<E: Entity>(items: &[E]) -> ItemLookup<'_, E> {
    let mut by_id = HashMap::with_capacity(items.len());
    let mut collisions = Vec::new();

    for item in items {
        if by_id.insert(item.id(), item).is_some() {
            tracing::warn!(id = ?item.id(), "duplicate identifier in inventory; later record wins");
            collisions.push(item.id().clone());
        }
    }

    ItemLookup { by_id, collisions }
}

/// Items of one category, in their original relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub items: Vec<&'a InventoryItem>,
}

/// Filtered items partitioned by category, categories sorted by label.
pub type GroupedView<'a> = Vec<CategoryGroup<'a>>;

/// Filter by a case-insensitive substring of name or category, then group.
///
/// The term is matched as typed, surrounding whitespace included. Only an
/// empty term keeps every item; no match yields an empty view.
pub fn group_and_filter<'a>(items: &'a [InventoryItem], search_term: &str) -> GroupedView<'a> {
    let needle = search_term.to_lowercase();

    let mut groups: GroupedView<'a> = Vec::new();
    for item in items.iter().filter(|item| item.matches(&needle)) {
        match groups.iter_mut().find(|g| g.category == item.category()) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                category: item.category(),
                items: vec![item],
            }),
        }
    }

    groups.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()));
    groups
}

/// Owner of the in-memory inventory.
///
/// The list is replaced as a whole; every replacement bumps `epoch()` so that
/// in-flight work started against an older list can tell it was superseded.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    items: Vec<InventoryItem>,
    index: HashMap<ItemId, usize>,
    epoch: u64,
}

impl InventoryStore {
    pub fn new(items: Vec<InventoryItem>) -> (Self, Vec<DomainError>) {
        let mut store = Self::default();
        let warnings = store.replace(items);
        (store, warnings)
    }

    /// Replace the whole inventory; returns one warning per colliding id.
    pub fn replace(&mut self, items: Vec<InventoryItem>) -> Vec<DomainError> {
        let mut index = HashMap::with_capacity(items.len());
        let mut warnings = Vec::new();

        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.id().clone(), pos).is_some() {
                tracing::warn!(
                    item_id = %item.id(),
                    "duplicate item id in inventory; later record wins"
                );
                warnings.push(DomainError::data_integrity(format!(
                    "duplicate item id {} in inventory",
                    item.id()
                )));
            }
        }

        self.items = items;
        self.index = index;
        self.epoch += 1;
        tracing::info!(items = self.items.len(), epoch = self.epoch, "inventory replaced");
        warnings
    }

    pub fn get(&self, id: &ItemId) -> Option<&InventoryItem> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn lookup(&self) -> ItemLookup<'_> {
        lookup_by_id(&self.items)
    }

    pub fn grouped(&self, search_term: &str) -> GroupedView<'_> {
        group_and_filter(&self.items, search_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewInventoryItem;
    use proptest::prelude::*;
    use restock_core::StoreId;

    fn item(id: &str, name: &str, category: Category) -> InventoryItem {
        InventoryItem::try_from(NewInventoryItem {
            id: ItemId::new(id).unwrap(),
            name: name.to_string(),
            category,
            price: 100.0,
            current_stock: 120,
            reorder_point: 56,
            store_id: StoreId::new("S001").unwrap(),
            history: None,
        })
        .unwrap()
    }

    fn sample() -> Vec<InventoryItem> {
        vec![
            item("P1", "Rain Jacket", Category::Clothing),
            item("P2", "Puzzle Set", Category::Toys),
            item("P3", "Power Bank", Category::Electronics),
            item("P4", "Baseball Cap", Category::Clothing),
            item("P5", "Oatmeal", Category::Groceries),
        ]
    }

    fn ids(group: &CategoryGroup<'_>) -> Vec<String> {
        group.items.iter().map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn empty_term_groups_everything_sorted() {
        let items = sample();
        let view = group_and_filter(&items, "");
        let labels: Vec<_> = view.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(labels, ["Clothing", "Electronics", "Groceries", "Toys"]);
        assert_eq!(ids(&view[0]), ["P1", "P4"]);
        assert_eq!(view.iter().map(|g| g.items.len()).sum::<usize>(), items.len());
    }

    #[test]
    fn term_matches_name_or_category_case_insensitively() {
        let items = sample();

        let view = group_and_filter(&items, "CAP");
        assert_eq!(view.len(), 1);
        assert_eq!(ids(&view[0]), ["P4"]);

        let view = group_and_filter(&items, "electro");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].category, Category::Electronics);
    }

    #[test]
    fn substring_not_only_prefix() {
        let items = sample();
        let view = group_and_filter(&items, "zzle");
        assert_eq!(ids(&view[0]), ["P2"]);
    }

    #[test]
    fn whitespace_is_part_of_the_term() {
        let items = sample();

        let view = group_and_filter(&items, " cap");
        assert_eq!(view.len(), 1);
        assert_eq!(ids(&view[0]), ["P4"]);

        let view = group_and_filter(&items, " ");
        let labels: Vec<_> = view.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(labels, ["Clothing", "Electronics", "Toys"]);
        assert_eq!(ids(&view[0]), ["P1", "P4"]);

        assert!(group_and_filter(&items, "   ").is_empty());
        assert!(group_and_filter(&items, "cap ").is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        let items = sample();
        assert!(group_and_filter(&items, "submarine").is_empty());
    }

    #[test]
    fn lookup_reports_collisions_and_keeps_last() {
        let items = vec![
            item("P1", "First", Category::Toys),
            item("P1", "Second", Category::Toys),
        ];
        let lookup = lookup_by_id(&items);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.get(&ItemId::new("P1").unwrap()).unwrap().name(), "Second");
        assert_eq!(lookup.collisions().len(), 1);
    }

    #[test]
    fn store_replace_bumps_epoch_and_reindexes() {
        let (mut store, warnings) = InventoryStore::new(sample());
        assert!(warnings.is_empty());
        assert_eq!(store.epoch(), 1);
        assert!(store.get(&ItemId::new("P3").unwrap()).is_some());

        let warnings = store.replace(vec![
            item("P9", "Board Game: Catan", Category::Toys),
            item("P9", "Board Game: Catan", Category::Toys),
        ]);
        assert_eq!(store.epoch(), 2);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].is_warning());
        assert!(store.get(&ItemId::new("P3").unwrap()).is_none());
        assert_eq!(store.len(), 2);
    }

    fn arb_category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::MODELLED.to_vec())
    }

    proptest! {
        /// Grouping is a partition of the filtered set that preserves order.
        #[test]
        fn grouping_partitions_filtered_items(
            specs in prop::collection::vec(("[a-z ]{1,12}", arb_category()), 0..30),
            term in "[a-z]{0,3}",
        ) {
            let items: Vec<InventoryItem> = specs
                .iter()
                .enumerate()
                .filter(|(_, (name, _))| !name.trim().is_empty())
                .map(|(i, (name, cat))| item(&format!("P{i}"), name, *cat))
                .collect();

            let view = group_and_filter(&items, &term);

            let expected: Vec<&InventoryItem> =
                items.iter().filter(|i| i.matches(&term.to_lowercase())).collect();
            let total: usize = view.iter().map(|g| g.items.len()).sum();
            prop_assert_eq!(total, expected.len());

            for pair in view.windows(2) {
                prop_assert!(pair[0].category.as_str() < pair[1].category.as_str());
            }

            for group in &view {
                let in_order: Vec<&InventoryItem> = expected
                    .iter()
                    .copied()
                    .filter(|i| i.category() == group.category)
                    .collect();
                prop_assert_eq!(&group.items, &in_order);
            }
        }
    }
}
