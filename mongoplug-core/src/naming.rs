//! Default collection naming convention.
//!
//! The convention is the lower-camel-case form of an entity type's simple
//! name: `UserAccount` maps to collection `userAccount`. Types that want a
//! different name override [`Entity::collection_name`](crate::entity::Entity::collection_name)
//! explicitly; there is no runtime metadata lookup.

/// Lowercases the first character of a name, leaving the rest untouched.
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the default collection name for a type: the simple type name
/// (module path and generic arguments stripped) in lower camel case.
pub fn default_collection_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let simple = base.rsplit("::").next().unwrap_or(base);
    lower_camel(simple)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UserAccount;
    struct Wrapped<T>(T);

    #[test]
    fn lowercases_first_character_only() {
        assert_eq!(lower_camel("UserAccount"), "userAccount");
        assert_eq!(lower_camel("X"), "x");
        assert_eq!(lower_camel("already"), "already");
        assert_eq!(lower_camel(""), "");
    }

    #[test]
    fn derives_name_from_simple_type_name() {
        assert_eq!(default_collection_name::<UserAccount>(), "userAccount");
    }

    #[test]
    fn strips_generic_arguments() {
        assert_eq!(default_collection_name::<Wrapped<String>>(), "wrapped");
    }
}
