use std::fmt;

use non_empty_string::NonEmptyString;

use crate::domain::marker::Marker;

/// A software design requirement recovered from one marker occurrence.
///
/// Every field is resolved (fallbacks included) before a requirement is
/// constructed, and it is never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    component: String,
    name: NonEmptyString,
    version: NonEmptyString,
    title: NonEmptyString,
    description: NonEmptyString,
}

impl Requirement {
    /// Assembles a requirement from a marker and its recovered texts.
    #[must_use]
    pub fn new(
        component: impl Into<String>,
        marker: Marker,
        title: NonEmptyString,
        description: NonEmptyString,
    ) -> Self {
        let Marker { name, version } = marker;
        Self {
            component: component.into(),
            name,
            version,
            title,
            description,
        }
    }

    /// The component label supplied by the caller.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// The marker's name field, verbatim.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The marker's version field, verbatim.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// The heading text associated with the requirement.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// The prose summary associated with the requirement.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{} {}", self.name(), self.version(), self.title())
    }
}
