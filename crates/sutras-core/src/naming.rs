//! Skill naming rules.
//!
//! A skill is either scoped (`@namespace/name`) or bare (`name`). Both parts
//! are limited to ASCII alphanumerics, hyphens and underscores.

use std::fmt;

use sutras_util::errors::{SutrasError, SutrasResult};

const ALLOWED_CHARS_MESSAGE: &str =
    "Only alphanumeric characters, hyphens and underscores are allowed";

/// A parsed skill name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkillName {
    pub namespace: Option<String>,
    pub name: String,
    pub is_scoped: bool,
}

impl SkillName {
    /// Parse `@namespace/name` or a bare `name`.
    pub fn parse(raw: &str) -> SutrasResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(invalid("Skill name cannot be empty"));
        }

        if let Some(scoped) = raw.strip_prefix('@') {
            let Some((namespace, name)) = scoped.split_once('/') else {
                return Err(invalid(format!(
                    "Invalid scoped skill name '{raw}': expected '@namespace/name'"
                )));
            };
            if namespace.is_empty() || name.is_empty() || name.contains('/') {
                return Err(invalid(format!(
                    "Invalid scoped skill name '{raw}': expected '@namespace/name'"
                )));
            }
            validate_namespace(namespace)?;
            validate_skill_name(name)?;
            return Ok(Self {
                namespace: Some(namespace.to_string()),
                name: name.to_string(),
                is_scoped: true,
            });
        }

        if raw.contains('/') {
            return Err(invalid(format!(
                "Invalid skill name '{raw}'. Use '@namespace/name' format for scoped skills"
            )));
        }

        validate_skill_name(raw)?;
        Ok(Self {
            namespace: None,
            name: raw.to_string(),
            is_scoped: false,
        })
    }

    /// A name safe to use as a single path component: `@user/skill` → `user_skill`.
    pub fn to_filesystem_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}_{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) if self.is_scoped => write!(f, "@{ns}/{}", self.name),
            _ => f.write_str(&self.name),
        }
    }
}

/// Validate a registry namespace (the part after `@`).
pub fn validate_namespace(namespace: &str) -> SutrasResult<()> {
    if namespace.is_empty() {
        return Err(invalid("Namespace cannot be empty"));
    }
    if !namespace.chars().all(is_name_char) {
        return Err(invalid(format!(
            "Invalid namespace '{namespace}'. {ALLOWED_CHARS_MESSAGE}"
        )));
    }
    Ok(())
}

/// Validate the unscoped part of a skill name.
pub fn validate_skill_name(name: &str) -> SutrasResult<()> {
    if name.is_empty() {
        return Err(invalid("Skill name cannot be empty"));
    }
    if !name.chars().all(is_name_char) {
        return Err(invalid(format!(
            "Invalid skill name '{name}'. {ALLOWED_CHARS_MESSAGE}"
        )));
    }
    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn invalid(message: impl Into<String>) -> SutrasError {
    SutrasError::InvalidName {
        message: message.into(),
    }
}
