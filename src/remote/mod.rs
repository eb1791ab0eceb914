//! Remote Datadog state.
//!
//! The rest of the crate only sees [`RemoteGateway`]. [`DatadogClient`] is
//! the HTTP implementation; tests swap in [`fake::FakeGateway`].

mod datadog;
#[cfg(test)]
pub mod fake;

pub use datadog::{DatadogClient, REQUEST_TIMEOUT};

use crate::error::Result;
use crate::model::{ConfigCollection, ConfigObject, ObjectKind};

/// CRUD surface of the remote service, per object kind.
///
/// Calls are synchronous round-trips. Any call may fail with
/// [`crate::Error::Forbidden`] when the credentials are rejected.
pub trait RemoteGateway {
    /// Fetch every object of `kind`.
    ///
    /// For kinds whose [`crate::model::KindInfo::list_is_summary`] is set,
    /// entries only carry summary fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response isn't a list of objects.
    fn list(&self, kind: ObjectKind) -> Result<ConfigCollection>;

    /// Fetch the full definition of one object.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the object doesn't exist.
    fn get(&self, kind: ObjectKind, id: &str) -> Result<ConfigObject>;

    /// Replace an object's definition. `fields` must not contain the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote rejects the update.
    fn update(&self, kind: ObjectKind, id: &str, fields: &ConfigObject) -> Result<ConfigObject>;
}
