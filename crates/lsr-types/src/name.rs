//! Hierarchical names and sync update name classification.
//!
//! Every object exchanged through the dissemination scope is addressed by a
//! slash-separated hierarchical name. A marker component inside the name
//! identifies which update category it carries:
//!
//! - `<router>/lsa/<destination...>` — routing update
//! - `<router>/keys/...`             — key/trust update
//! - `<router>/id-cert`              — identity announcement

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// Marker component for routing updates.
pub const ROUTING_MARKER: &str = "lsa";
/// Marker component for key/trust updates.
pub const KEY_MARKER: &str = "keys";
/// Marker component for identity announcements.
pub const IDENTITY_MARKER: &str = "id-cert";

/// A hierarchical, slash-separated name.
///
/// The empty name (`/`) is valid and is used as the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    components: Vec<String>,
}

impl Name {
    /// Creates an empty (root) name.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a name from components, skipping empty ones.
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components
                .into_iter()
                .map(Into::into)
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Returns the components of this name.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if this is the root name.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Appends a single component, returning the extended name.
    pub fn append(mut self, component: impl Into<String>) -> Self {
        let component = component.into();
        if !component.is_empty() {
            self.components.push(component);
        }
        self
    }

    /// Joins another name onto this one, returning the combined name.
    pub fn join(mut self, other: &Name) -> Self {
        self.components.extend(other.components.iter().cloned());
        self
    }

    /// Returns the name formed by the first `n` components.
    pub fn prefix(&self, n: usize) -> Name {
        Name {
            components: self.components.iter().take(n).cloned().collect(),
        }
    }

    /// Returns true if `prefix` is a prefix of this name.
    pub fn starts_with(&self, prefix: &Name) -> bool {
        self.components.len() >= prefix.components.len()
            && self.components[..prefix.components.len()] == prefix.components[..]
    }

    /// Returns the position of the first component equal to `marker`.
    fn find_marker(&self, marker: &str) -> Option<usize> {
        self.components.iter().position(|c| c == marker)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::InvalidName("empty string".to_string()));
        }
        Ok(Name::from_components(s.split('/')))
    }
}

impl TryFrom<String> for Name {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Name> for String {
    fn from(name: Name) -> String {
        name.to_string()
    }
}

/// Identity of a participating router in the dissemination scope.
///
/// Used as the namespace root for everything the router publishes, and as
/// the key for purging its state when it leaves the scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouterName(Name);

impl RouterName {
    /// Creates a router name. Fails on the root name.
    pub fn new(name: Name) -> Result<Self, ParseError> {
        if name.is_empty() {
            return Err(ParseError::InvalidRouterName(
                "router name must not be empty".to_string(),
            ));
        }
        Ok(Self(name))
    }

    /// Returns the underlying name.
    pub fn as_name(&self) -> &Name {
        &self.0
    }

    /// Consumes self and returns the underlying name.
    pub fn into_name(self) -> Name {
        self.0
    }
}

impl fmt::Display for RouterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RouterName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouterName::new(s.parse()?)
    }
}

impl TryFrom<String> for RouterName {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RouterName> for String {
    fn from(name: RouterName) -> String {
        name.to_string()
    }
}

/// Update categories tracked by independent sequence counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateCategory {
    /// Routing (link-state advertisement) updates.
    Routing,
    /// Key/trust (certificate) updates.
    Key,
    /// Identity announcements.
    Identity,
}

impl fmt::Display for UpdateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateCategory::Routing => write!(f, "routing"),
            UpdateCategory::Key => write!(f, "key"),
            UpdateCategory::Identity => write!(f, "identity"),
        }
    }
}

/// A sync update name classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateName {
    /// Routing update: `<router>/lsa/<destination...>`.
    Routing {
        router: RouterName,
        destination: Name,
    },
    /// Key update: `<router>/keys/...` — the full name is the certificate name.
    Key { router: RouterName, cert_name: Name },
    /// Identity announcement: `<router>/id-cert`.
    Identity {
        router: RouterName,
        identity_name: Name,
    },
    /// Name shape not understood by this router.
    Unrecognized,
}

impl UpdateName {
    /// Classifies an update name by the first marker component found.
    ///
    /// A marker with no router components before it is unrecognized.
    pub fn classify(name: &Name) -> UpdateName {
        if let Some(pos) = name.find_marker(ROUTING_MARKER) {
            let Ok(router) = RouterName::new(name.prefix(pos)) else {
                return UpdateName::Unrecognized;
            };
            let destination = Name::from_components(name.components()[pos + 1..].iter().cloned());
            return UpdateName::Routing {
                router,
                destination,
            };
        }
        if let Some(pos) = name.find_marker(KEY_MARKER) {
            let Ok(router) = RouterName::new(name.prefix(pos)) else {
                return UpdateName::Unrecognized;
            };
            return UpdateName::Key {
                router,
                cert_name: name.clone(),
            };
        }
        if let Some(pos) = name.find_marker(IDENTITY_MARKER) {
            let Ok(router) = RouterName::new(name.prefix(pos)) else {
                return UpdateName::Unrecognized;
            };
            return UpdateName::Identity {
                router,
                identity_name: name.clone(),
            };
        }
        UpdateName::Unrecognized
    }

    /// Builds a routing update name: `<router>/lsa/<destination...>`.
    pub fn routing(router: &RouterName, destination: &Name) -> Name {
        router
            .as_name()
            .clone()
            .append(ROUTING_MARKER)
            .join(destination)
    }

    /// Builds an identity announcement name: `<identity>/id-cert`.
    pub fn identity(identity: &Name) -> Name {
        identity.clone().append(IDENTITY_MARKER)
    }

    /// Returns the category of a classified name, if recognized.
    pub fn category(&self) -> Option<UpdateCategory> {
        match self {
            UpdateName::Routing { .. } => Some(UpdateCategory::Routing),
            UpdateName::Key { .. } => Some(UpdateCategory::Key),
            UpdateName::Identity { .. } => Some(UpdateCategory::Identity),
            UpdateName::Unrecognized => None,
        }
    }
}
