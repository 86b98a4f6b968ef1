//! Convenient re-exports of commonly used types from mongoplug.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use mongoplug::prelude::*;
//! ```

pub use mongoplug_core::{
    config::{Credentials, MongoConfig, ServerEntry, WriteConcernPolicy},
    entity::Entity,
    error::{MongoPlugError, MongoPlugResult},
    naming::{default_collection_name, lower_camel},
};

pub use crate::{
    bootstrap::Bootstrapper,
    collection::CollectionHandle,
    mapper::{Mapper, MapperConfigurer},
    registry::{CollectionKey, MongoRegistry},
};
