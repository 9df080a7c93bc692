//! Tag set and library variable set snapshot types

use crate::ids::{LibraryVariableSetId, TagSetId};
use serde::{Deserialize, Serialize};

/// One tag inside a tag set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Display name
    pub name: String,
    /// Fully qualified `"{TagSet}/{Tag}"` name used on tenants
    pub canonical_tag_name: String,
}

impl Tag {
    /// Create a tag with its canonical name derived from the set name
    #[must_use]
    pub fn new(set_name: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        let canonical_tag_name = format!("{set_name}/{name}");
        Self {
            name,
            canonical_tag_name,
        }
    }
}

/// A named collection of tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagSet {
    /// Remote-assigned identifier
    pub id: TagSetId,
    /// Display name
    pub name: String,
    /// Member tags
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl TagSet {
    /// Ensure a tag exists in the set, returning `true` if it was added
    pub fn ensure_tag(&mut self, name: &str) -> bool {
        if self.tags.iter().any(|tag| tag.name == name) {
            false
        } else {
            self.tags.push(Tag::new(&self.name, name));
            true
        }
    }

    /// Look up a tag's canonical name
    #[must_use]
    pub fn canonical_name_of(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.canonical_tag_name.as_str())
    }
}

/// A variable template carried by a library variable set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VariableTemplate {
    /// Template variable name, e.g. `"Tenant.Region"`
    pub name: String,
    /// Operator-facing label
    pub label: String,
    /// Value used when a tenant supplies none
    #[serde(default)]
    pub default_value: Option<String>,
}

impl VariableTemplate {
    /// Create a template with no default
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            default_value: None,
        }
    }
}

/// A shared variable set holding tenant variable templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryVariableSet {
    /// Remote-assigned identifier
    pub id: LibraryVariableSetId,
    /// Display name
    pub name: String,
    /// Variable templates tenants are prompted for
    #[serde(default)]
    pub templates: Vec<VariableTemplate>,
}

impl LibraryVariableSet {
    /// Ensure a template exists by name, returning `true` if it was added
    pub fn ensure_template(&mut self, template: VariableTemplate) -> bool {
        if self.templates.iter().any(|t| t.name == template.name) {
            false
        } else {
            self.templates.push(template);
            true
        }
    }
}
