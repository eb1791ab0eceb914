//! List command implementation.

use serde::Serialize;

use crate::cli::commands::connect;
use crate::cli::Cli;
use crate::error::Result;
use crate::model::{id_key, object_id, ConfigObject, ObjectKind};
use crate::prompt::Prompter;
use crate::remote::RemoteGateway;

/// One listed object.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ListEntry {
    pub id: Option<String>,
    pub label: Option<String>,
}

/// Execute list command.
///
/// # Errors
///
/// Returns [`crate::Error::UnknownKind`] for an unregistered config type,
/// or the gateway error.
pub fn execute(cli: &Cli, config_type: &str, prompter: &mut dyn Prompter, json: bool) -> Result<()> {
    let kind = ObjectKind::from_plural_key(config_type)?;
    let client = connect(cli, prompter)?;
    let entries = run(&client, kind)?;

    if json {
        println!("{}", serde_json::to_string(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No {} found.", kind.plural_key());
    }
    for entry in &entries {
        println!(
            "{} {}  ({})",
            kind.emoji(),
            entry.label.as_deref().unwrap_or("<untitled>"),
            entry.id.as_deref().unwrap_or("no id")
        );
    }

    Ok(())
}

/// List remote objects of `kind` as id/label pairs.
///
/// # Errors
///
/// Returns the gateway error.
pub fn run(gateway: &dyn RemoteGateway, kind: ObjectKind) -> Result<Vec<ListEntry>> {
    let label_field = kind.info().label_field;

    Ok(gateway
        .list(kind)?
        .iter()
        .map(|object| ListEntry {
            id: object_id(object),
            label: label(object, label_field),
        })
        .collect())
}

fn label(object: &ConfigObject, field: &str) -> Option<String> {
    object.get(field).filter(|v| !v.is_null()).map(id_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::remote::fake::FakeGateway;
    use serde_json::json;

    #[test]
    fn test_list_uses_kind_label_field() {
        let gateway = FakeGateway::new()
            .with_objects(
                ObjectKind::Monitor,
                vec![json!({"id": 12, "name": "cpu high"}).as_object().cloned().unwrap()],
            )
            .with_objects(
                ObjectKind::Dashboard,
                vec![json!({"id": "abc", "title": "Overview", "widgets": []}).as_object().cloned().unwrap()],
            );

        assert_eq!(
            run(&gateway, ObjectKind::Monitor).unwrap(),
            vec![ListEntry {
                id: Some("12".to_string()),
                label: Some("cpu high".to_string()),
            }]
        );
        assert_eq!(
            run(&gateway, ObjectKind::Dashboard).unwrap()[0].label.as_deref(),
            Some("Overview")
        );
    }

    #[test]
    fn test_list_propagates_forbidden() {
        let gateway = FakeGateway::new().forbidden();
        assert!(matches!(run(&gateway, ObjectKind::Monitor), Err(Error::Forbidden { .. })));
    }
}
