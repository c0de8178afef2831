use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::utils::params::{find_placeholders, is_parameter_name, substitute_placeholders};
use crate::utils::time::parse_datetime;

/// Declared metadata for a named placeholder.
///
/// A parameter without a default is required when the snippet is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    default: Option<String>,
    description: Option<String>,
}

impl Parameter {
    /// Creates a parameter, trimming every field. Blank defaults and
    /// descriptions count as absent.
    pub fn new(name: &str, default: Option<String>, description: Option<String>) -> Result<Self> {
        let name = name.trim();
        if !is_parameter_name(name) {
            return Err(Error::InvalidParameterName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            default: normalize_text(default),
            description: normalize_text(description),
        })
    }

    /// A required parameter with no metadata.
    pub fn required(name: &str) -> Result<Self> {
        Self::new(name, None, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Caller-supplied fields for a new snippet, before normalization.
#[derive(Debug, Clone, Default)]
pub struct NewSnippet {
    pub command: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub alias: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl NewSnippet {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// Partial update of a stored snippet.
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the value and `Some(Some(..))` replaces it. A supplied parameter
/// list replaces the whole declared set.
#[derive(Debug, Clone, Default)]
pub struct SnippetPatch {
    pub command: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub alias: Option<Option<String>>,
    pub parameters: Option<Vec<Parameter>>,
}

impl SnippetPatch {
    pub fn is_empty(&self) -> bool {
        self.command.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.alias.is_none()
            && self.parameters.is_none()
    }
}

/// A stored command template plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    command: String,
    description: Option<String>,
    tags: Vec<String>,
    alias: Option<String>,
    parameters: IndexMap<String, Parameter>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Snippet {
    /// Builds a normalized snippet stamped with the current time.
    pub fn new(fields: NewSnippet) -> Result<Self> {
        let now = Utc::now();
        Self::with_timestamps(fields, now, now)
    }

    /// Builds a normalized snippet with explicit timestamps. `updated_at` is
    /// raised to `created_at` if it would otherwise precede it.
    pub fn with_timestamps(
        fields: NewSnippet,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self> {
        let command = fields.command.trim().to_string();
        if command.is_empty() {
            return Err(Error::EmptyCommand);
        }

        // Later declarations of the same name win, keeping the first position.
        let mut parameters = IndexMap::new();
        for parameter in fields.parameters {
            parameters.insert(parameter.name.clone(), parameter);
        }

        Ok(Self {
            command,
            description: normalize_text(fields.description),
            tags: normalize_tags(fields.tags),
            alias: normalize_alias(fields.alias)?,
            parameters,
            created_at,
            updated_at: updated_at.max(created_at),
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Explicitly declared parameters, in declaration order.
    pub fn parameters(&self) -> &IndexMap<String, Parameter> {
        &self.parameters
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Every parameter the command needs: declared ones first in declared
    /// order, then placeholders found only in the command, in order of first
    /// occurrence. Inline `{name=default}` defaults apply to the latter.
    pub fn get_all_parameters(&self) -> Vec<Parameter> {
        let mut all: Vec<Parameter> = self.parameters.values().cloned().collect();
        for placeholder in find_placeholders(&self.command) {
            if self.parameters.contains_key(&placeholder.name) {
                continue;
            }
            all.push(Parameter {
                name: placeholder.name,
                default: normalize_text(placeholder.default),
                description: None,
            });
        }
        all
    }

    /// Resolves every parameter and substitutes it into the command.
    ///
    /// Empty supplied values fall back to the default. Values for unknown
    /// names are ignored. Fails on the first required parameter without a
    /// value, in `get_all_parameters` order.
    pub fn apply_parameters(&self, values: &HashMap<String, String>) -> Result<String> {
        let mut resolved = HashMap::new();
        for parameter in self.get_all_parameters() {
            let supplied = values
                .get(parameter.name())
                .map(String::as_str)
                .filter(|v| !v.is_empty());
            let value = supplied.or(parameter.default()).map(str::to_string);
            let Some(value) = value else {
                return Err(Error::MissingParameter(parameter.name));
            };
            resolved.insert(parameter.name, value);
        }

        if resolved.is_empty() {
            return Ok(self.command.clone());
        }
        Ok(substitute_placeholders(&self.command, &resolved))
    }

    /// Applies a patch, re-normalizing every field. `created_at` is kept and
    /// `updated_at` becomes `now`, never moving backwards.
    pub fn patched(&self, patch: SnippetPatch, now: DateTime<Utc>) -> Result<Self> {
        let fields = NewSnippet {
            command: patch.command.unwrap_or_else(|| self.command.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            tags: patch.tags.unwrap_or_else(|| self.tags.clone()),
            alias: patch.alias.unwrap_or_else(|| self.alias.clone()),
            parameters: patch
                .parameters
                .unwrap_or_else(|| self.parameters.values().cloned().collect()),
        };
        Self::with_timestamps(fields, self.created_at, now.max(self.updated_at))
    }

    /// Case-insensitive substring match against command, description, tags
    /// and alias. `query` must already be lowercased.
    pub(crate) fn matches(&self, query: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(query);
        contains(&self.command)
            || self.description.as_deref().is_some_and(contains)
            || self.tags.iter().any(|tag| contains(tag.as_str()))
            || self.alias.as_deref().is_some_and(contains)
    }

    pub fn to_record(&self) -> SnippetRecord {
        SnippetRecord {
            command: self.command.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            alias: self.alias.clone(),
            parameters: self
                .parameters
                .values()
                .map(|p| {
                    (
                        p.name.clone(),
                        ParameterRecord {
                            default: p.default.clone(),
                            description: p.description.clone(),
                        },
                    )
                })
                .collect(),
            created_at: Some(self.created_at.to_rfc3339()),
            updated_at: Some(self.updated_at.to_rfc3339()),
        }
    }

    /// Rebuilds a snippet from its persisted form. Missing or unreadable
    /// timestamps fall back to `now`.
    pub fn from_record(record: SnippetRecord, now: DateTime<Utc>) -> Result<Self> {
        let created_at = record
            .created_at
            .as_deref()
            .and_then(parse_datetime)
            .unwrap_or(now);
        let updated_at = record
            .updated_at
            .as_deref()
            .and_then(parse_datetime)
            .unwrap_or(created_at);

        let parameters = record
            .parameters
            .into_iter()
            .map(|(name, p)| Parameter::new(&name, p.default, p.description))
            .collect::<Result<Vec<_>>>()?;

        let fields = NewSnippet {
            command: record.command,
            description: record.description,
            tags: record.tags,
            alias: record.alias,
            parameters,
        };
        Self::with_timestamps(fields, created_at, updated_at)
    }
}

/// On-disk form of a snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

fn normalize_alias(alias: Option<String>) -> Result<Option<String>> {
    match normalize_text(alias) {
        Some(alias) if !is_alias_name(&alias) => Err(Error::InvalidAlias(alias)),
        alias => Ok(alias),
    }
}

/// Names a POSIX shell accepts for both `alias` and function definitions.
fn is_alias_name(name: &str) -> bool {
    !name.starts_with('-')
        && !name.chars().all(|c| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
