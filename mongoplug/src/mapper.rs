//! Serialization mapper and customization hooks.
//!
//! A [`Mapper`] is the immutable per-collection serialization/option
//! configuration the registry binds into every collection handle. One
//! global default mapper is resolved at bootstrap; a [`MapperConfigurer`]
//! can derive a customized mapper globally (once, at bootstrap) and per
//! collection (on first request). Derivation is non-mutating: configurers
//! return a new mapper and the original stays untouched.

use mongodb::options::{
    Acknowledgment, CollectionOptions, ReadConcern, SelectionCriteria, WriteConcern,
};

use mongoplug_core::config::WriteConcernPolicy;

/// Immutable serialization and collection-option configuration.
///
/// Carries the optional write concern, read concern and server selection
/// criteria applied when a collection handle is constructed. The `with_*`
/// methods consume the mapper and return a derived value.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    write_concern: Option<WriteConcern>,
    read_concern: Option<ReadConcern>,
    selection_criteria: Option<SelectionCriteria>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_write_concern(self, write_concern: WriteConcern) -> Self {
        Self {
            write_concern: Some(write_concern),
            ..self
        }
    }

    pub fn with_read_concern(self, read_concern: ReadConcern) -> Self {
        Self {
            read_concern: Some(read_concern),
            ..self
        }
    }

    pub fn with_selection_criteria(self, selection_criteria: SelectionCriteria) -> Self {
        Self {
            selection_criteria: Some(selection_criteria),
            ..self
        }
    }

    pub fn write_concern(&self) -> Option<&WriteConcern> {
        self.write_concern.as_ref()
    }

    pub fn read_concern(&self) -> Option<&ReadConcern> {
        self.read_concern.as_ref()
    }

    pub fn selection_criteria(&self) -> Option<&SelectionCriteria> {
        self.selection_criteria.as_ref()
    }

    pub(crate) fn collection_options(&self) -> CollectionOptions {
        CollectionOptions::builder()
            .write_concern(self.write_concern.clone())
            .read_concern(self.read_concern.clone())
            .selection_criteria(self.selection_criteria.clone())
            .build()
    }
}

/// Maps a parsed named write-concern policy onto the driver's type.
pub fn write_concern_from_policy(policy: WriteConcernPolicy) -> WriteConcern {
    match policy {
        WriteConcernPolicy::Acknowledged => {
            WriteConcern::builder().w(Acknowledgment::Nodes(1)).build()
        }
        WriteConcernPolicy::Unacknowledged => {
            WriteConcern::builder().w(Acknowledgment::Nodes(0)).build()
        }
        WriteConcernPolicy::Journaled => WriteConcern::builder().journal(true).build(),
        WriteConcernPolicy::Majority => WriteConcern::majority(),
        WriteConcernPolicy::Nodes(n) => WriteConcern::builder().w(Acknowledgment::Nodes(n)).build(),
    }
}

/// Pluggable hook customizing the mapper globally and per collection.
///
/// The global hook runs once at bootstrap against the default mapper; the
/// per-collection hook runs on each cache miss against a clone of the
/// global mapper, receiving the collection name and the entity/key type
/// names. Both default to identity.
pub trait MapperConfigurer: Send + Sync {
    /// Customizes the global default mapper, once, at bootstrap.
    fn configure(&self, mapper: Mapper) -> Mapper {
        mapper
    }

    /// Derives a per-collection mapper from the global one.
    fn configure_collection(
        &self,
        mapper: Mapper,
        _collection: &str,
        _entity_type: &'static str,
        _key_type: &'static str,
    ) -> Mapper {
        mapper
    }
}
