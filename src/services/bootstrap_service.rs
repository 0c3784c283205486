// src/services/bootstrap_service.rs

use std::fmt;

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    Database, IndexModel,
};

use crate::config::{AppUser, Config};
use crate::error::{BootstrapError, Result};
use crate::models::trademark::TrademarkRegistry;
use crate::schema::{self, IndexSpec, COLLECTIONS, INDEXES, TRADEMARK_IDS};

/// Role granted to the application user on the target database.
pub const APP_ROLE: &str = "readWrite";

/// Whether a step created something or found it already in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Existing,
}

/// What a bootstrap run did, step by step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub database: String,
    pub user: String,
    pub user_outcome: Outcome,
    pub collections: Vec<(&'static str, Outcome)>,
    pub indexes: Vec<(&'static IndexSpec, Outcome)>,
    pub seed: Outcome,
}

impl BootstrapReport {
    /// True when the run changed nothing on the server.
    pub fn is_noop(&self) -> bool {
        self.user_outcome == Outcome::Existing
            && self.seed == Outcome::Existing
            && self.collections.iter().all(|(_, o)| *o == Outcome::Existing)
            && self.indexes.iter().all(|(_, o)| *o == Outcome::Existing)
    }
}

impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.collections.iter().map(|(name, _)| *name).collect();
        writeln!(f, "WM-MEGA MongoDB initialization completed successfully!")?;
        writeln!(f, "Database: {}", self.database)?;
        writeln!(f, "User: {}", self.user)?;
        write!(f, "Collections created: {}", names.join(", "))
    }
}

/// Creates the application user unless `usersInfo` already knows it.
/// An existing user keeps its current password and roles.
pub async fn ensure_app_user(db: &Database, user: &AppUser) -> Result<Outcome> {
    if find_user(db, &user.username).await?.is_some() {
        log::info!("User {} already exists on {}, skipping", user.username, db.name());
        return Ok(Outcome::Existing);
    }

    db.run_command(
        doc! {
            "createUser": user.username.as_str(),
            "pwd": user.password.as_str(),
            "roles": [ { "role": APP_ROLE, "db": db.name() } ],
        },
        None,
    )
    .await
    .map_err(BootstrapError::step("create user"))?;

    log::info!("Created user {} with {} on {}", user.username, APP_ROLE, db.name());
    Ok(Outcome::Created)
}

async fn find_user(db: &Database, username: &str) -> Result<Option<Document>> {
    let reply = db
        .run_command(doc! { "usersInfo": { "user": username, "db": db.name() } }, None)
        .await
        .map_err(BootstrapError::step("look up user"))?;

    let user = reply
        .get_array("users")
        .ok()
        .and_then(|users| users.iter().find_map(|u| u.as_document().cloned()));
    Ok(user)
}

/// Creates each missing collection, in declaration order.
pub async fn ensure_collections(db: &Database) -> Result<Vec<(&'static str, Outcome)>> {
    let existing = db
        .list_collection_names(None)
        .await
        .map_err(BootstrapError::step("list collections"))?;

    let mut outcomes = Vec::with_capacity(COLLECTIONS.len());
    for name in COLLECTIONS {
        if existing.iter().any(|e| e == name) {
            log::info!("Collection {} already exists, skipping", name);
            outcomes.push((name, Outcome::Existing));
            continue;
        }
        db.create_collection(name, None)
            .await
            .map_err(BootstrapError::step("create collection"))?;
        log::info!("Created collection {}", name);
        outcomes.push((name, Outcome::Created));
    }
    Ok(outcomes)
}

/// Creates each declared index that the collection does not already carry, in table order.
/// Collections must exist before this runs.
pub async fn ensure_indexes(db: &Database) -> Result<Vec<(&'static IndexSpec, Outcome)>> {
    let mut outcomes = Vec::with_capacity(INDEXES.len());
    for name in COLLECTIONS {
        let existing = list_indexes(db, name, "list indexes").await?;

        for spec in schema::indexes_for(name) {
            if existing.iter().any(|model| index_matches(model, spec)) {
                log::info!("Index {}:{} already exists, skipping", name, spec.field);
                outcomes.push((spec, Outcome::Existing));
                continue;
            }

            let result = db
                .collection::<Document>(name)
                .create_index(spec.to_model(), None)
                .await
                .map_err(BootstrapError::step("create index"))?;
            log::info!(
                "Created index {} on {} (unique: {})",
                result.index_name,
                name,
                spec.unique
            );
            outcomes.push((spec, Outcome::Created));
        }
    }
    Ok(outcomes)
}

async fn list_indexes(db: &Database, collection: &str, step: &'static str) -> Result<Vec<IndexModel>> {
    db.collection::<Document>(collection)
        .list_indexes(None)
        .await
        .map_err(BootstrapError::step(step))?
        .try_collect()
        .await
        .map_err(BootstrapError::step(step))
}

/// Inserts an empty trademark registry when `trademark_ids` holds no documents.
pub async fn seed_trademarks(db: &Database) -> Result<Outcome> {
    let collection = db.collection::<TrademarkRegistry>(TRADEMARK_IDS);

    let count = collection
        .count_documents(None, None)
        .await
        .map_err(BootstrapError::step("seed document"))?;
    if count > 0 {
        log::info!("{} already holds {} document(s), skipping seed", TRADEMARK_IDS, count);
        return Ok(Outcome::Existing);
    }

    collection
        .insert_one(TrademarkRegistry::empty(Utc::now()), None)
        .await
        .map_err(BootstrapError::step("seed document"))?;
    log::info!("Seeded {} with an empty registry", TRADEMARK_IDS);
    Ok(Outcome::Created)
}

/// Runs every bootstrap step in order against `db`. The first failure aborts the rest.
pub async fn run(db: &Database, config: &Config) -> Result<BootstrapReport> {
    log::info!("Bootstrapping database {}", db.name());

    let user_outcome = ensure_app_user(db, &config.app_user).await?;
    let collections = ensure_collections(db).await?;
    let indexes = ensure_indexes(db).await?;
    let seed = seed_trademarks(db).await?;

    Ok(BootstrapReport {
        database: db.name().to_string(),
        user: config.app_user.username.clone(),
        user_outcome,
        collections,
        indexes,
        seed,
    })
}

/// Reads the database back and lists every way it differs from the declared layout.
/// An empty list means the database is fully initialized.
pub async fn verify(db: &Database, config: &Config) -> Result<Vec<String>> {
    let mut problems = Vec::new();

    match find_user(db, &config.app_user.username).await? {
        None => problems.push(format!("user {} is missing", config.app_user.username)),
        Some(user) if !has_role(&user, APP_ROLE, db.name()) => problems.push(format!(
            "user {} lacks {} on {}",
            config.app_user.username,
            APP_ROLE,
            db.name()
        )),
        Some(_) => {}
    }

    let existing = db
        .list_collection_names(None)
        .await
        .map_err(BootstrapError::step("verify"))?;
    for name in COLLECTIONS {
        if !existing.iter().any(|e| e == name) {
            problems.push(format!("collection {} is missing", name));
            continue;
        }

        let indexes = list_indexes(db, name, "verify").await?;

        for spec in schema::indexes_for(name) {
            if !indexes.iter().any(|model| index_matches(model, spec)) {
                problems.push(format!(
                    "index {}:{} ({:?}, unique: {}) is missing",
                    name, spec.field, spec.direction, spec.unique
                ));
            }
        }
    }

    // The application stores its own documents next to the registry, so only the
    // registry's presence is checked.
    if existing.iter().any(|e| e == TRADEMARK_IDS) {
        let registries = db
            .collection::<Document>(TRADEMARK_IDS)
            .count_documents(registry_filter(), None)
            .await
            .map_err(BootstrapError::step("verify"))?;
        if registries == 0 {
            problems.push(format!("{} holds no trademark registry", TRADEMARK_IDS));
        }
    }

    Ok(problems)
}

fn registry_filter() -> Document {
    doc! {
        "trademarks": { "$exists": true },
        "entities": { "$exists": true },
    }
}

fn index_matches(model: &IndexModel, spec: &IndexSpec) -> bool {
    model.keys.len() == 1
        && key_direction(&model.keys, spec.field) == Some(spec.direction.as_key() as i64)
        && model.options.as_ref().and_then(|o| o.unique).unwrap_or(false) == spec.unique
}

fn has_role(user: &Document, role: &str, database: &str) -> bool {
    user.get_array("roles")
        .map(|roles| {
            roles.iter().filter_map(Bson::as_document).any(|r| {
                r.get_str("role").ok() == Some(role) && r.get_str("db").ok() == Some(database)
            })
        })
        .unwrap_or(false)
}

// The server may echo index directions back as int32, int64 or double.
fn key_direction(keys: &Document, field: &str) -> Option<i64> {
    match keys.get(field)? {
        Bson::Int32(v) => Some(*v as i64),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) => Some(*v as i64),
        _ => None,
    }
}
