//! Typed collection handles.
//!
//! A [`CollectionHandle`] is a thin typed wrapper bound to one collection
//! name, one entity type, one key type and one [`Mapper`]. Handles are
//! immutable after creation and safe for concurrent use; they share the
//! registry's client connection and never close it themselves.

use std::fmt;
use std::marker::PhantomData;

use bson::{Document, doc, ser::serialize_to_bson};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Serialize, de::DeserializeOwned};

use mongoplug_core::error::{MongoPlugError, MongoPlugResult};

use crate::mapper::Mapper;

/// A typed accessor for one collection, parameterized by the entity type
/// `T` and the `_id` key type `K`.
pub struct CollectionHandle<T, K>
where
    T: Send + Sync,
{
    name: String,
    mapper: Mapper,
    inner: Collection<T>,
    _key: PhantomData<K>,
}

impl<T, K> CollectionHandle<T, K>
where
    T: Send + Sync,
{
    pub(crate) fn new(database: &Database, name: &str, mapper: Mapper) -> Self {
        let inner = database.collection_with_options::<T>(name, mapper.collection_options());
        Self {
            name: name.to_string(),
            mapper,
            inner,
            _key: PhantomData,
        }
    }

    /// The name of the bound collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effective mapper this handle was built with.
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// The underlying driver collection, for operations this wrapper does
    /// not expose.
    pub fn raw(&self) -> &Collection<T> {
        &self.inner
    }
}

impl<T, K> CollectionHandle<T, K>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
    K: Serialize + Send + Sync,
{
    fn id_filter(&self, id: &K) -> MongoPlugResult<Document> {
        Ok(doc! { "_id": serialize_to_bson(id)? })
    }

    pub async fn insert_one(&self, entity: &T) -> MongoPlugResult<()> {
        self.inner
            .insert_one(entity)
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))?;

        Ok(())
    }

    pub async fn insert_many(&self, entities: &[T]) -> MongoPlugResult<()> {
        self.inner
            .insert_many(entities)
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &K) -> MongoPlugResult<Option<T>> {
        self.inner
            .find_one(self.id_filter(id)?)
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))
    }

    /// Replaces the document with the given id. Returns whether a document
    /// was modified.
    pub async fn replace_by_id(&self, id: &K, entity: &T) -> MongoPlugResult<bool> {
        let result = self
            .inner
            .replace_one(self.id_filter(id)?, entity)
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))?;

        Ok(result.modified_count > 0)
    }

    /// Deletes the document with the given id. Returns whether a document
    /// was deleted.
    pub async fn delete_by_id(&self, id: &K) -> MongoPlugResult<bool> {
        let result = self
            .inner
            .delete_one(self.id_filter(id)?)
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    pub async fn find(&self, filter: Document) -> MongoPlugResult<Vec<T>> {
        self.inner
            .find(filter)
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))?
            .try_collect::<Vec<T>>()
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))
    }

    pub async fn count(&self, filter: Document) -> MongoPlugResult<u64> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| MongoPlugError::Driver(e.to_string()))
    }
}

impl<T, K> Clone for CollectionHandle<T, K>
where
    T: Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            mapper: self.mapper.clone(),
            inner: self.inner.clone(),
            _key: PhantomData,
        }
    }
}

impl<T, K> fmt::Debug for CollectionHandle<T, K>
where
    T: Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionHandle")
            .field("name", &self.name)
            .field("entity", &std::any::type_name::<T>())
            .field("key", &std::any::type_name::<K>())
            .field("mapper", &self.mapper)
            .finish()
    }
}
