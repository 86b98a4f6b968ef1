//! MongoDB connection bootstrap and typed collection registry.
//!
//! This crate wires the official MongoDB Rust driver into a host
//! application through two cooperating pieces:
//!
//! - **Connection bootstrapper** ([`bootstrap`]) - Resolves configuration
//!   (a URI, or a server list plus database name, with an optional default
//!   write concern) into a live database handle, lazily and exactly once
//! - **Collection registry** ([`registry`]) - Hands out cached typed
//!   [`CollectionHandle`]s keyed by (name, entity type, key type)
//! - **Mapper customization** ([`mapper`]) - A pluggable hook deriving
//!   per-collection serialization/option configuration from a global
//!   default
//!
//! Lifecycle is explicit: construct a [`MongoRegistry`], optionally
//! [`connect`](registry::MongoRegistry::connect) eagerly, and
//! [`dispose`](registry::MongoRegistry::dispose) it on shutdown. There is
//! no container magic and no background retry; configuration errors fail
//! fast and driver errors pass through.
//!
//! # Quick Start
//!
//! ```ignore
//! use mongoplug::prelude::*;
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct UserAccount {
//!     #[serde(rename = "_id")]
//!     pub id: Uuid,
//!     pub name: String,
//! }
//!
//! impl Entity for UserAccount {
//!     type Key = Uuid;
//!     // collection name defaults to "userAccount"
//! }
//!
//! #[tokio::main]
//! async fn main() -> MongoPlugResult<()> {
//!     let registry = MongoRegistry::new(MongoConfig {
//!         uri: Some("mongodb://localhost:27017/app".to_string()),
//!         ..MongoConfig::default()
//!     });
//!
//!     let accounts = registry.entity_collection::<UserAccount>().await?;
//!     accounts
//!         .insert_one(&UserAccount {
//!             id: Uuid::new(),
//!             name: "Alice".to_string(),
//!         })
//!         .await?;
//!
//!     registry.dispose().await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mongoplug;

pub mod bootstrap;
pub mod collection;
pub mod mapper;
pub mod prelude;
pub mod registry;

pub use mongoplug_core::{config, entity, error, naming};

pub use bootstrap::Bootstrapper;
pub use collection::CollectionHandle;
pub use config::MongoConfig;
pub use entity::Entity;
pub use error::{MongoPlugError, MongoPlugResult};
pub use mapper::{Mapper, MapperConfigurer};
pub use registry::{CollectionKey, MongoRegistry};
