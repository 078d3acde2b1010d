//!
//! Declarative access control schema.
//!
//! A schema lists groups. Each group may inherit other groups and owns a list of
//! permissions. Loading it yields the graph store used for expansion: a group's
//! children are its inherited groups followed by its own permissions.
//!
//! ```json
//! {
//!   "groups": [
//!     { "id": "Waiter", "type": "role", "permissions": [{ "id": "ReadOrder" }] },
//!     { "id": "Chief", "inherits": ["Waiter"], "permissions": [{ "id": "DeleteOrder" }] }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::SchemaError;
use crate::primitives::{AccessControl, AccessControlId, AccessControlKind};
use crate::store::InMemoryAccessControlStore;

/// Unknown keys are rejected, so a misspelled `inherits` or `permissions` fails to
/// load instead of silently dropping grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessControlSchema {
    #[serde(default)]
    pub groups: Vec<GroupDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDefinition {
    pub id: AccessControlId,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    /// Ids of groups whose permissions this group also grants.
    #[serde(default)]
    pub inherits: Vec<AccessControlId>,
    #[serde(default)]
    pub permissions: Vec<PermissionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionDefinition {
    pub id: AccessControlId,
}

impl AccessControlSchema {
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, SchemaError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Validates the schema and turns it into a store.
    ///
    /// Ids must be non-empty and unique across groups and permissions. Inheriting an
    /// undeclared group or forming an inheritance cycle is accepted here; expansion
    /// reports the former as unresolved and terminates on the latter.
    pub fn build_store(&self) -> Result<InMemoryAccessControlStore, SchemaError> {
        let mut seen: HashSet<&AccessControlId> = HashSet::new();
        let mut store = InMemoryAccessControlStore::new();

        for group in &self.groups {
            if group.id.as_str().is_empty() {
                return Err(SchemaError::EmptyId { context: None });
            }
            if !seen.insert(&group.id) {
                return Err(SchemaError::DuplicateId(group.id.clone()));
            }
            if group.inherits.iter().any(|parent| parent.as_str().is_empty()) {
                return Err(SchemaError::EmptyId { context: Some(group.id.clone()) });
            }
            for permission in &group.permissions {
                if permission.id.as_str().is_empty() {
                    return Err(SchemaError::EmptyId { context: Some(group.id.clone()) });
                }
                if !seen.insert(&permission.id) {
                    return Err(SchemaError::DuplicateId(permission.id.clone()));
                }
                store.insert(AccessControl::permission(permission.id.clone()));
            }

            let children = group
                .inherits
                .iter()
                .chain(group.permissions.iter().map(|p| &p.id))
                .cloned()
                .collect();
            store.insert(AccessControl {
                id: group.id.clone(),
                kind: AccessControlKind::Group { group_type: group.group_type.clone() },
                children,
            });
        }

        for group in &self.groups {
            for parent in &group.inherits {
                if !seen.contains(parent) {
                    tracing::debug!(group = %group.id, inherits = %parent, "Group inherits an undeclared group");
                }
            }
        }

        tracing::debug!(groups = self.groups.len(), access_controls = store.len(), "Access control schema loaded");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand;
    use crate::store::AccessControlStore;
    use std::io::Write;

    const RESTAURANT: &str = r#"{
        "groups": [
            { "id": "Waiter", "type": "role",
              "permissions": [{ "id": "ReadOrder" }, { "id": "CreateOrder" }] },
            { "id": "Cook", "type": "role",
              "permissions": [{ "id": "UpdateOrder" }] },
            { "id": "Chief", "type": "role", "inherits": ["Waiter", "Cook"],
              "permissions": [{ "id": "DeleteOrder" }] }
        ]
    }"#;

    #[test]
    fn test_builds_group_children_in_order() {
        let store = AccessControlSchema::from_json_str(RESTAURANT).unwrap().build_store().unwrap();
        assert_eq!(store.len(), 7);

        let chief = store.lookup(&"Chief".into()).unwrap();
        assert_eq!(
            chief.children,
            vec![AccessControlId::from("Waiter"), AccessControlId::from("Cook"), AccessControlId::from("DeleteOrder")]
        );
        assert_eq!(chief.kind, AccessControlKind::Group { group_type: Some("role".into()) });
        assert_eq!(store.lookup(&"ReadOrder".into()).unwrap().kind, AccessControlKind::Permission);
    }

    #[test]
    fn test_loaded_store_expands() {
        let store = AccessControlSchema::from_json_str(RESTAURANT).unwrap().build_store().unwrap();
        let expansion = expand(&store, vec![AccessControlId::from("Chief")]);
        assert_eq!(expansion.resolved.len(), 7);
        assert!(expansion.is_complete());
    }

    #[test]
    fn test_duplicate_permission_across_groups_rejected() {
        let json = r#"{ "groups": [
            { "id": "A", "permissions": [{ "id": "Read" }] },
            { "id": "B", "permissions": [{ "id": "Read" }] }
        ] }"#;
        let err = AccessControlSchema::from_json_str(json).unwrap().build_store().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateId(id) if id.as_str() == "Read"));
    }

    #[test]
    fn test_group_and_permission_share_namespace() {
        let json = r#"{ "groups": [
            { "id": "A", "permissions": [{ "id": "B" }] },
            { "id": "B" }
        ] }"#;
        let err = AccessControlSchema::from_json_str(json).unwrap().build_store().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateId(_)));
    }

    #[test]
    fn test_empty_id_rejected() {
        let json = r#"{ "groups": [ { "id": "A", "permissions": [{ "id": "" }] } ] }"#;
        let err = AccessControlSchema::from_json_str(json).unwrap().build_store().unwrap_err();
        assert!(matches!(err, SchemaError::EmptyId { context: Some(ref id) } if id.as_str() == "A"));
    }

    #[test]
    fn test_empty_inherits_id_rejected() {
        let json = r#"{ "groups": [ { "id": "A", "inherits": [""] } ] }"#;
        let err = AccessControlSchema::from_json_str(json).unwrap().build_store().unwrap_err();
        assert!(matches!(err, SchemaError::EmptyId { context: Some(ref id) } if id.as_str() == "A"));
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        let group_typo = r#"{ "groups": [
            { "id": "Waiter", "permissions": [{ "id": "ReadOrder" }] },
            { "id": "Chief", "inherit": ["Waiter"] }
        ] }"#;
        assert!(matches!(AccessControlSchema::from_json_str(group_typo), Err(SchemaError::Parse(_))));

        let permission_typo = r#"{ "groups": [ { "id": "A", "permissions": [{ "id": "Read", "name": "x" }] } ] }"#;
        assert!(matches!(AccessControlSchema::from_json_str(permission_typo), Err(SchemaError::Parse(_))));

        let root_typo = r#"{ "group": [] }"#;
        assert!(matches!(AccessControlSchema::from_json_str(root_typo), Err(SchemaError::Parse(_))));
    }

    #[test]
    fn test_cycles_and_dangling_inheritance_load() {
        let json = r#"{ "groups": [
            { "id": "A", "inherits": ["B"] },
            { "id": "B", "inherits": ["A", "Missing"] }
        ] }"#;
        let store = AccessControlSchema::from_json_str(json).unwrap().build_store().unwrap();
        let expansion = expand(&store, vec![AccessControlId::from("A")]);
        assert_eq!(expansion.resolved.len(), 2);
        assert_eq!(expansion.unresolved, vec![AccessControlId::from("Missing")]);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = AccessControlSchema::from_json_str("{ \"groups\": [ { } ] }").unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RESTAURANT.as_bytes()).unwrap();
        let schema = AccessControlSchema::from_path(file.path()).unwrap();
        assert_eq!(schema.groups.len(), 3);

        let missing = AccessControlSchema::from_path(file.path().with_extension("absent"));
        assert!(matches!(missing, Err(SchemaError::Io(_))));
    }
}
