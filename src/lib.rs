//! One-time initialization of the WM-MEGA MongoDB database.
//!
//! Creates the application user, the fixed collections and indexes, and seeds the
//! trademark registry. Re-running against an initialized database changes nothing.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod services;

pub use config::Config;
pub use error::{BootstrapError, Result};
pub use services::bootstrap_service::{run, verify, BootstrapReport, Outcome};
