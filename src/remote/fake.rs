//! In-memory gateway for tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::RemoteGateway;
use crate::error::{Error, Result};
use crate::model::{object_id, ConfigCollection, ConfigObject, ObjectKind};

/// A gateway call, as recorded by [`FakeGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ObjectKind),
    Get(ObjectKind, String),
    Update(ObjectKind, String, ConfigObject),
}

/// Serves canned objects and records every call.
///
/// `list` returns the summary form (id + label field) for kinds whose list
/// endpoint is summary-only, mirroring the real API.
#[derive(Debug, Default)]
pub struct FakeGateway {
    objects: BTreeMap<ObjectKind, ConfigCollection>,
    fail_get: Option<String>,
    fail_update: Option<String>,
    forbidden: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(mut self, kind: ObjectKind, objects: ConfigCollection) -> Self {
        self.objects.insert(kind, objects);
        self
    }

    /// Make `get` fail for this id.
    pub fn failing_get(mut self, id: &str) -> Self {
        self.fail_get = Some(id.to_string());
        self
    }

    /// Make `update` fail for this id.
    pub fn failing_update(mut self, id: &str) -> Self {
        self.fail_update = Some(id.to_string());
        self
    }

    /// Reject every call with [`Error::Forbidden`].
    pub fn forbidden(mut self) -> Self {
        self.forbidden = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.forbidden {
            return Err(Error::Forbidden { credentials: None });
        }
        Ok(())
    }

    fn find(&self, kind: ObjectKind, id: &str) -> Option<&ConfigObject> {
        self.objects
            .get(&kind)?
            .iter()
            .find(|o| object_id(o).as_deref() == Some(id))
    }
}

impl RemoteGateway for FakeGateway {
    fn list(&self, kind: ObjectKind) -> Result<ConfigCollection> {
        self.record(Call::List(kind))?;
        let objects = self.objects.get(&kind).cloned().unwrap_or_default();

        if !kind.info().list_is_summary {
            return Ok(objects);
        }

        let label = kind.info().label_field;
        Ok(objects
            .into_iter()
            .map(|full| {
                full.into_iter()
                    .filter(|(key, _)| key == "id" || key == label)
                    .collect()
            })
            .collect())
    }

    fn get(&self, kind: ObjectKind, id: &str) -> Result<ConfigObject> {
        self.record(Call::Get(kind, id.to_string()))?;
        if self.fail_get.as_deref() == Some(id) {
            return Err(Error::Remote {
                status: 500,
                message: format!("{kind} {id} unavailable"),
            });
        }

        self.find(kind, id).cloned().ok_or_else(|| Error::Remote {
            status: 404,
            message: format!("{kind} {id} not found"),
        })
    }

    fn update(&self, kind: ObjectKind, id: &str, fields: &ConfigObject) -> Result<ConfigObject> {
        self.record(Call::Update(kind, id.to_string(), fields.clone()))?;
        if self.fail_update.as_deref() == Some(id) {
            return Err(Error::Remote {
                status: 400,
                message: format!("{kind} {id} rejected"),
            });
        }

        let mut updated = fields.clone();
        updated.insert("id".to_string(), serde_json::Value::String(id.to_string()));
        Ok(updated)
    }
}
