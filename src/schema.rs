//! Collections and indexes of the `walmart` database.

use mongodb::bson::Document;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;

pub const PRODUCTS: &str = "products";
pub const LOGS: &str = "logs";
pub const BATCH_IDS: &str = "batch_ids";
pub const GENERATED_SKUS: &str = "generated_skus";
pub const TRADEMARK_IDS: &str = "trademark_ids";

/// Collections created by the bootstrap, in creation order.
pub const COLLECTIONS: [&str; 5] = [PRODUCTS, LOGS, BATCH_IDS, GENERATED_SKUS, TRADEMARK_IDS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Key value as MongoDB expects it in an index specification.
    pub fn as_key(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// A single-field index declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub field: &'static str,
    pub direction: SortDirection,
    pub unique: bool,
}

impl IndexSpec {
    const fn new(collection: &'static str, field: &'static str, direction: SortDirection) -> Self {
        Self { collection, field, direction, unique: false }
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn keys(&self) -> Document {
        let mut keys = Document::new();
        keys.insert(self.field, self.direction.as_key());
        keys
    }

    pub fn to_model(&self) -> IndexModel {
        let builder = IndexModel::builder().keys(self.keys());
        if self.unique {
            builder
                .options(IndexOptions::builder().unique(true).build())
                .build()
        } else {
            builder.build()
        }
    }
}

use SortDirection::{Ascending, Descending};

/// Indexes created by the bootstrap, in creation order.
pub const INDEXES: [IndexSpec; 9] = [
    IndexSpec::new(PRODUCTS, "name", Ascending),
    IndexSpec::new(PRODUCTS, "link", Ascending),
    IndexSpec::new(PRODUCTS, "sku", Ascending),
    IndexSpec::new(PRODUCTS, "timestamp", Descending),
    IndexSpec::new(LOGS, "timestamp", Descending),
    IndexSpec::new(LOGS, "department", Ascending),
    IndexSpec::new(LOGS, "status", Ascending),
    IndexSpec::new(BATCH_IDS, "batch_id", Ascending).unique(),
    IndexSpec::new(GENERATED_SKUS, "sku", Ascending).unique(),
];

/// Declared indexes for one collection.
pub fn indexes_for(collection: &str) -> impl Iterator<Item = &'static IndexSpec> + '_ {
    INDEXES.iter().filter(move |spec| spec.collection == collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn every_index_targets_a_declared_collection() {
        for spec in INDEXES.iter() {
            assert!(COLLECTIONS.contains(&spec.collection), "{:?}", spec);
        }
    }

    #[test]
    fn products_has_four_non_unique_indexes() {
        let products: Vec<_> = indexes_for(PRODUCTS).collect();
        assert_eq!(products.len(), 4);
        assert!(products.iter().all(|spec| !spec.unique));
        assert_eq!(
            products.iter().map(|s| s.field).collect::<Vec<_>>(),
            vec!["name", "link", "sku", "timestamp"]
        );
        assert_eq!(products[3].direction, SortDirection::Descending);
    }

    #[test]
    fn only_batch_ids_and_generated_skus_are_unique() {
        let unique: Vec<_> = INDEXES
            .iter()
            .filter(|spec| spec.unique)
            .map(|spec| (spec.collection, spec.field))
            .collect();
        assert_eq!(unique, vec![(BATCH_IDS, "batch_id"), (GENERATED_SKUS, "sku")]);
    }

    #[test]
    fn model_carries_direction_and_uniqueness() {
        let descending = IndexSpec::new(LOGS, "timestamp", Descending).to_model();
        assert_eq!(descending.keys, doc! { "timestamp": -1 });
        assert!(descending.options.is_none());

        let unique = IndexSpec::new(BATCH_IDS, "batch_id", Ascending).unique().to_model();
        assert_eq!(unique.keys, doc! { "batch_id": 1 });
        assert_eq!(unique.options.and_then(|o| o.unique), Some(true));
    }

    #[test]
    fn trademark_ids_has_no_indexes() {
        assert_eq!(indexes_for(TRADEMARK_IDS).count(), 0);
    }
}
