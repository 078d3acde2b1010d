use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

// --- Identifiers ------------------------------------------------------------

/// Unique string key of an [`AccessControl`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AccessControlId(pub String);

impl AccessControlId {
    pub fn new(id: impl Into<String>) -> Self {
        AccessControlId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccessControlId {
    fn from(id: &str) -> Self {
        AccessControlId(id.to_string())
    }
}

impl From<String> for AccessControlId {
    fn from(id: String) -> Self {
        AccessControlId(id)
    }
}

impl std::borrow::Borrow<str> for AccessControlId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// --- Access controls --------------------------------------------------------

/// Whether an access control composes others or is a leaf permission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessControlKind {
    /// Composite node. `group_type` is a free-form classification such as "role".
    Group {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_type: Option<String>,
    },
    /// Leaf permission.
    Permission,
}

/// A named permission or group of permissions.
///
/// Identity is the `id`: two values with the same id are equal and hash the same,
/// whatever their children say. This keeps result sets free of duplicates even if
/// a store were to hand out two different snapshots of one definition.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AccessControl {
    pub id: AccessControlId,
    pub kind: AccessControlKind,
    /// Direct child references, in declaration order. Empty for leaves.
    #[serde(default)]
    pub children: Vec<AccessControlId>,
}

impl AccessControl {
    /// Leaf permission without children.
    pub fn permission(id: impl Into<AccessControlId>) -> Self {
        AccessControl {
            id: id.into(),
            kind: AccessControlKind::Permission,
            children: Vec::new(),
        }
    }

    /// Group referencing the given children.
    pub fn group<I, C>(id: impl Into<AccessControlId>, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<AccessControlId>,
    {
        AccessControl {
            id: id.into(),
            kind: AccessControlKind::Group { group_type: None },
            children: children.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_group_type(mut self, group_type: impl Into<String>) -> Self {
        if let AccessControlKind::Group { group_type: ref mut t } = self.kind {
            *t = Some(group_type.into());
        }
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl PartialEq for AccessControl {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AccessControl {}

impl Hash for AccessControl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::borrow::Borrow<AccessControlId> for AccessControl {
    fn borrow(&self) -> &AccessControlId {
        &self.id
    }
}

// --- Granted authorities ----------------------------------------------------

/// A resolved [`AccessControl`] as seen by the authorization layer.
///
/// Equality and hashing delegate to the wrapped access control, so a
/// `HashSet<GrantedAuthority>` holds at most one entry per id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct GrantedAuthority(AccessControl);

impl GrantedAuthority {
    pub fn new(access_control: AccessControl) -> Self {
        GrantedAuthority(access_control)
    }

    /// Authority string checked by downstream authorization: the access control id.
    pub fn authority(&self) -> &str {
        self.0.id.as_str()
    }

    pub fn access_control(&self) -> &AccessControl {
        &self.0
    }
}

impl std::borrow::Borrow<AccessControlId> for GrantedAuthority {
    fn borrow(&self) -> &AccessControlId {
        &self.0.id
    }
}

impl From<AccessControl> for GrantedAuthority {
    fn from(access_control: AccessControl) -> Self {
        GrantedAuthority(access_control)
    }
}

// --- Principals -------------------------------------------------------------

/// Internal identity record fed to the access control source.
pub trait Principal: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;
}

/// Principal carrying nothing but its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SimplePrincipal {
    pub name: String,
}

impl SimplePrincipal {
    pub fn new(name: impl Into<String>) -> Self {
        SimplePrincipal { name: name.into() }
    }
}

impl Principal for SimplePrincipal {
    fn name(&self) -> &str {
        &self.name
    }
}

// --- Credentials ------------------------------------------------------------

/// Secret material supplied at login. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials(Option<String>);

impl Credentials {
    pub fn password(secret: impl Into<String>) -> Self {
        Credentials(Some(secret.into()))
    }

    pub fn none() -> Self {
        Credentials(None)
    }

    pub fn expose_secret(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Credentials(<redacted>)"),
            None => f.write_str("Credentials(None)"),
        }
    }
}

/// Username and credentials of one login attempt, handed to the user service
/// once the credentials have been verified.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub credentials: Credentials,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, credentials: Credentials) -> Self {
        LoginRequest {
            username: username.into(),
            credentials,
        }
    }
}

// --- Authenticated user -----------------------------------------------------

/// Outcome of a successful authentication. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser<P> {
    username: String,
    credentials: Credentials,
    principal: P,
    authorities: HashSet<GrantedAuthority>,
}

impl<P: Principal> AuthenticatedUser<P> {
    pub fn new(
        username: impl Into<String>,
        credentials: Credentials,
        principal: P,
        authorities: HashSet<GrantedAuthority>,
    ) -> Self {
        AuthenticatedUser {
            username: username.into(),
            credentials,
            principal,
            authorities,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn principal(&self) -> &P {
        &self.principal
    }

    pub fn authorities(&self) -> &HashSet<GrantedAuthority> {
        &self.authorities
    }

    pub fn has_authority(&self, id: &str) -> bool {
        self.authorities.iter().any(|a| a.authority() == id)
    }

    /// Authority strings in sorted order, handy for logging and assertions.
    pub fn authority_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.authorities.iter().map(GrantedAuthority::authority).collect();
        names.sort_unstable();
        names
    }
}
