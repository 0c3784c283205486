use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

/// The registry document kept in `trademark_ids`.
///
/// The bootstrap seeds one empty registry. The scraper appends to
/// `trademarks` and `entities` afterwards and bumps `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrademarkRegistry {
    /// Known trademark identifiers.
    #[serde(default)]
    pub trademarks: Vec<String>,

    /// Known entity identifiers.
    #[serde(default)]
    pub entities: Vec<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TrademarkRegistry {
    /// An empty registry stamped with `now` for both timestamps.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            trademarks: Vec::new(),
            entities: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
