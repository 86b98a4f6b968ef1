//! Driver-independent core of the mongoplug integration.
//!
//! This crate provides:
//!
//! - **Configuration** ([`config`]) - Connection configuration model and
//!   strict/lenient parsing of server lists, write-concern names and
//!   credentials
//! - **Entity trait** ([`entity`]) - Compile-time declaration of an entity's
//!   key type and collection name
//! - **Naming convention** ([`naming`]) - Lower-camel-case default
//!   collection names
//! - **Error handling** ([`error`]) - The integration's error taxonomy and
//!   result type
//!
//! The driver-coupled pieces (bootstrapper, registry, collection handles)
//! live in the `mongoplug` crate, which re-exports this one.

#[allow(unused_extern_crates)]
extern crate self as mongoplug_core;

pub mod config;
pub mod entity;
pub mod error;
pub mod naming;
