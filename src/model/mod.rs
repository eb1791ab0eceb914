//! Data models for Doghouse.
//!
//! - [`ObjectKind`] and its static registry
//! - [`ConfigObject`] / [`ConfigCollection`]: opaque API objects

pub mod kind;
pub mod object;

pub use kind::{all_kinds, KindInfo, ObjectKind};
pub use object::{
    collection_from_value, id_key, object_id, ConfigCollection, ConfigObject, ID_FIELD,
};
