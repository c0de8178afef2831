use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::db::models::Parameter;
use crate::error::{Error, Result};

/// A `{name}`, `${name}` or `{name=default}` token found in a command
/// template. The shell-style `${name}` form is replaced as a whole, `$`
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub default: Option<String>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$?\{([A-Za-z0-9_]+)(?:=([^{}]*))?\}").unwrap())
}

pub fn is_parameter_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Distinct placeholders in order of first occurrence.
///
/// A name's inline default is taken from the first occurrence that carries
/// one. Braces that do not form a placeholder are ignored.
pub fn find_placeholders(command: &str) -> Vec<Placeholder> {
    let mut placeholders: Vec<Placeholder> = Vec::new();
    for cap in placeholder_regex().captures_iter(command) {
        let name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str().to_string());
        match placeholders.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                if existing.default.is_none() {
                    existing.default = default;
                }
            }
            None => placeholders.push(Placeholder {
                name: name.to_string(),
                default,
            }),
        }
    }
    placeholders
}

/// Replaces every placeholder whose name is in `values` with the literal
/// value in a single pass. Inserted text is never rescanned; placeholders
/// without a value are left as they are.
pub fn substitute_placeholders(command: &str, values: &HashMap<String, String>) -> String {
    placeholder_regex()
        .replace_all(command, |cap: &Captures| match values.get(&cap[1]) {
            Some(value) => value.clone(),
            None => cap[0].to_string(),
        })
        .into_owned()
}

/// Parses comma-separated parameter definitions of the form
/// `name[=default][:description]`.
///
/// Examples:
///   - `host`
///   - `port=22`
///   - `host=localhost:The host to connect to,port=8080:Port number`
pub fn parse_parameter_definitions(input: &str) -> Result<Vec<Parameter>> {
    let mut parameters = Vec::new();
    for definition in input.split(',') {
        if definition.trim().is_empty() {
            continue;
        }

        let (head, description) = match definition.split_once(':') {
            Some((head, description)) => (head, Some(description.to_string())),
            None => (definition, None),
        };
        let (name, default) = match head.split_once('=') {
            Some((name, default)) => (name, Some(default.to_string())),
            None => (head, None),
        };

        parameters.push(Parameter::new(name, default, description)?);
    }
    Ok(parameters)
}

/// Parses `name=value` pairs as given on the command line. Later pairs
/// override earlier ones.
pub fn parse_parameter_values(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(Error::InvalidParameterValue(pair.clone()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidParameterValue(pair.clone()));
        }
        values.insert(name.to_string(), value.trim().to_string());
    }
    Ok(values)
}
