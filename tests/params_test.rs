use snippet_vault::utils::params::{
    find_placeholders, is_parameter_name, parse_parameter_definitions, parse_parameter_values,
    substitute_placeholders, Placeholder,
};
use snippet_vault::Error;
use std::collections::HashMap;

#[test]
fn test_find_placeholders_basic() {
    let placeholders = find_placeholders("echo {name}");
    assert_eq!(
        placeholders,
        vec![Placeholder {
            name: "name".to_string(),
            default: None
        }]
    );
}

#[test]
fn test_find_placeholders_first_occurrence_order() {
    let names: Vec<String> = find_placeholders("{b} {a} {b} {c_1} {a}")
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["b", "a", "c_1"]);
}

#[test]
fn test_find_placeholders_inline_default_from_first_carrier() {
    let placeholders = find_placeholders("{port} then {port=22} then {port=80}");
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].default.as_deref(), Some("22"));
}

#[test]
fn test_find_placeholders_ignores_non_identifiers() {
    assert!(find_placeholders("echo {} {a b} {a-b} {missing").is_empty());
    assert!(find_placeholders("awk '{print $1}'").is_empty());
}

#[test]
fn test_find_placeholders_nested_braces() {
    let placeholders = find_placeholders("echo {outer{inner}}");
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].name, "inner");
}

#[test]
fn test_substitute_single_pass() {
    let mut values = HashMap::new();
    values.insert("a".to_string(), "{b}".to_string());
    values.insert("b".to_string(), "B".to_string());
    assert_eq!(substitute_placeholders("{a}-{b}", &values), "{b}-B");
}

#[test]
fn test_substitute_leaves_unknown_placeholders() {
    let mut values = HashMap::new();
    values.insert("port".to_string(), "2222".to_string());
    assert_eq!(
        substitute_placeholders("ssh {host} -p {port=22}", &values),
        "ssh {host} -p 2222"
    );
}

#[test]
fn test_substitute_dollar_signs_are_literal() {
    let mut values = HashMap::new();
    values.insert("var".to_string(), "$1 ${HOME}".to_string());
    assert_eq!(substitute_placeholders("echo {var}", &values), "echo $1 ${HOME}");
}

#[test]
fn test_find_placeholders_dollar_brace_form() {
    let names: Vec<String> = find_placeholders("echo ${message} to {user} in $HOME")
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["message", "user"]);
}

#[test]
fn test_substitute_dollar_brace_replaced_whole() {
    let mut values = HashMap::new();
    values.insert("message".to_string(), "Hello".to_string());
    values.insert("user".to_string(), "World".to_string());
    assert_eq!(
        substitute_placeholders("echo ${message} to {user}", &values),
        "echo Hello to World"
    );
    assert_eq!(substitute_placeholders("echo ${other}", &values), "echo ${other}");
}

#[test]
fn test_is_parameter_name() {
    assert!(is_parameter_name("host"));
    assert!(is_parameter_name("user_name2"));
    assert!(is_parameter_name("1st"));
    assert!(!is_parameter_name(""));
    assert!(!is_parameter_name("with space"));
    assert!(!is_parameter_name("dash-ed"));
}

#[test]
fn test_parse_parameter_definitions() -> Result<(), Error> {
    let params =
        parse_parameter_definitions("host=localhost:The host to connect to, port=8080:Port number,user")?;
    assert_eq!(params.len(), 3);

    assert_eq!(params[0].name(), "host");
    assert_eq!(params[0].default(), Some("localhost"));
    assert_eq!(params[0].description(), Some("The host to connect to"));

    assert_eq!(params[1].name(), "port");
    assert_eq!(params[1].default(), Some("8080"));
    assert_eq!(params[1].description(), Some("Port number"));

    assert_eq!(params[2].name(), "user");
    assert!(params[2].is_required());
    assert_eq!(params[2].description(), None);
    Ok(())
}

#[test]
fn test_parse_parameter_definitions_description_only() -> Result<(), Error> {
    let params = parse_parameter_definitions("file:File to search in")?;
    assert_eq!(params[0].name(), "file");
    assert_eq!(params[0].default(), None);
    assert_eq!(params[0].description(), Some("File to search in"));
    Ok(())
}

#[test]
fn test_parse_parameter_definitions_default_with_equals() -> Result<(), Error> {
    let params = parse_parameter_definitions("filter=a=b")?;
    assert_eq!(params[0].default(), Some("a=b"));
    Ok(())
}

#[test]
fn test_parse_parameter_definitions_empty() -> Result<(), Error> {
    assert!(parse_parameter_definitions("")?.is_empty());
    assert!(parse_parameter_definitions(" , ")?.is_empty());
    Ok(())
}

#[test]
fn test_parse_parameter_definitions_invalid_name() {
    let result = parse_parameter_definitions("bad name=1");
    assert!(matches!(result, Err(Error::InvalidParameterName(ref n)) if n == "bad name"));
}

#[test]
fn test_parse_parameter_values() -> Result<(), Error> {
    let pairs = vec![
        "host=example.com".to_string(),
        " query = a=b ".to_string(),
        "empty=".to_string(),
        "host=override".to_string(),
    ];
    let values = parse_parameter_values(&pairs)?;
    assert_eq!(values.len(), 3);
    assert_eq!(values["host"], "override");
    assert_eq!(values["query"], "a=b");
    assert_eq!(values["empty"], "");
    Ok(())
}

#[test]
fn test_parse_parameter_values_invalid() {
    let result = parse_parameter_values(&["no-equals".to_string()]);
    assert!(matches!(result, Err(Error::InvalidParameterValue(ref v)) if v == "no-equals"));

    let result = parse_parameter_values(&["=value".to_string()]);
    assert!(result.is_err());
}
