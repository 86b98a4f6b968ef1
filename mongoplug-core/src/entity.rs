//! Core trait for types stored as MongoDB documents.

use serde::{Deserialize, Serialize};

use crate::naming::default_collection_name;

/// Trait for entity types that know their collection name and key type.
///
/// The key type is declared explicitly through the `Key` associated type,
/// and the collection name defaults to the lower-camel-case form of the
/// type's simple name. Both replace runtime metadata inspection with
/// compile-time declarations.
///
/// # Example
///
/// ```ignore
/// use mongoplug::Entity;
/// use bson::Uuid;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct UserAccount {
///     #[serde(rename = "_id")]
///     pub id: Uuid,
///     pub name: String,
/// }
///
/// impl Entity for UserAccount {
///     type Key = Uuid;
///     // collection name defaults to "userAccount"
/// }
/// ```
pub trait Entity:
    Sized + Serialize + for<'de> Deserialize<'de> + Send + Sync + Unpin + 'static
{
    /// The type of this entity's `_id` value.
    type Key: Serialize + Send + Sync + Unpin + 'static;

    /// The name of the collection this entity is stored in.
    ///
    /// Defaults to the lower-camel-case simple type name; override to pin
    /// an explicit name.
    fn collection_name() -> String {
        default_collection_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct UserAccount {
        #[serde(rename = "_id")]
        id: i64,
    }

    impl Entity for UserAccount {
        type Key = i64;
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct AuditEvent {
        #[serde(rename = "_id")]
        id: String,
    }

    impl Entity for AuditEvent {
        type Key = String;

        fn collection_name() -> String {
            "audit".to_string()
        }
    }

    #[test]
    fn default_name_follows_the_convention() {
        assert_eq!(UserAccount::collection_name(), "userAccount");
    }

    #[test]
    fn explicit_name_overrides_the_convention() {
        assert_eq!(AuditEvent::collection_name(), "audit");
    }
}
