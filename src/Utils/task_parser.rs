/// parse document with structure like
/// ```text
/// [general]
/// func = sin(x) + x^2
/// a: -2
/// task1
/// method = golden
/// ```
/// which has titles (bare or in square brackets) and key-value pairs separated by ':' or '='.
/// A value runs to the end of its line, so formulas may contain spaces.
/// Lines starting with //, #, % or ; are comments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{alpha1, alphanumeric1, line_ending, space0},
    combinator::{eof, map, recognize},
    multi::{many0, many1},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Value>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// Types are tried in order: integer, float, boolean, string. Quotes around a string
    /// are dropped.
    pub fn from_text(text: &str) -> Value {
        let s = text.trim();
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            let unquoted = s
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(s);
            Value::String(unquoted.to_string())
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// floats and integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// true/false plus the usual ini spellings yes/no, on/off, 1/0
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(1) => Some(true),
            Value::Integer(0) => Some(false),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => Some(true),
                "false" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    // Try to convert to string representation
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

/// Parses an identifier (word characters without spaces)
pub(crate) fn parse_key(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// Parses a title line: `name` or `[name]` alone on its line
pub(crate) fn parse_title(input: &str) -> IResult<&str, String> {
    let bracketed = delimited(
        terminated(tag("["), space0),
        parse_key,
        preceded(space0, tag("]")),
    );
    let end_of_line = preceded(space0, alt((line_ending, eof)));
    let mut parser = delimited(space0, alt((bracketed, parse_key)), end_of_line);
    parser.parse(input)
}

/// Parses the rest of the line as one value
pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    let value_parser = take_till(|c: char| c == '\n' || c == '\r');
    let mut value_parser = map(value_parser, Value::from_text);
    value_parser.parse(input)
}

/// Parses `key: value` or `key = value` up to the end of the line
pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Value)> {
    // space0 - Matches zero or more whitespace characters.
    let separator = delimited(space0, alt((tag(":"), tag("="))), space0);
    let mut parser = delimited(
        space0,
        separated_pair(parse_key, separator, parse_value),
        alt((line_ending, eof)),
    );
    parser.parse(input)
}

/// Parses a section with a title and its key-value pairs
pub(crate) fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = parse_title(input)?;
    let mut parser = many0(parse_key_value_pair);
    let (input, pairs) = parser.parse(input)?;
    let section_map: SectionMap = pairs.into_iter().collect();
    Ok((input, (title, section_map)))
}

/// Filters out comment lines (starting with //, #, %, or ;) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a HashMap; repeated sections are merged, later keys win.
pub fn parse_document(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    if filtered.is_empty() {
        return Ok(HashMap::new());
    }
    let mut parser = many1(parse_section);
    match parser.parse(filtered.as_str()) {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            let mut result: DocumentMap = HashMap::new();
            for (title, section_map) in sections {
                result.entry(title).or_default().extend(section_map);
            }
            Ok(result)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

#[cfg(test)]
mod tests1 {
    use super::*;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("title1\nkey1: value1").unwrap();
        assert_eq!(title, "title1");
        assert_eq!(remaining, "key1: value1");

        let (remaining, title) = parse_title("[ general ]  \nfunc = x").unwrap();
        assert_eq!(title, "general");
        assert_eq!(remaining, "func = x");

        let (remaining, title) = parse_title("task_2").unwrap();
        assert_eq!(title, "task_2");
        assert_eq!(remaining, "");

        // a key line is not a title
        assert!(parse_title("key1: value1").is_err());
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("sin(x) + x^2\nnext").unwrap();
        assert_eq!(value, Value::String("sin(x) + x^2".to_string()));
        assert_eq!(remaining, "\nnext");

        assert_eq!(parse_value("123").unwrap().1, Value::Integer(123));
        assert_eq!(parse_value("-2").unwrap().1, Value::Integer(-2));
        assert_eq!(parse_value("1e-4").unwrap().1, Value::Float(1e-4));
        assert_eq!(parse_value(" true ").unwrap().1, Value::Boolean(true));
        assert_eq!(
            parse_value("\"data dir\"").unwrap().1,
            Value::String("data dir".to_string())
        );
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, value)) = parse_key_value_pair("key1: value1\nkey2: 2").unwrap();
        assert_eq!(key, "key1");
        assert_eq!(value, Value::String("value1".to_string()));
        assert_eq!(remaining, "key2: 2");

        let (remaining, (key, value)) = parse_key_value_pair("  eps = 0.001").unwrap();
        assert_eq!(key, "eps");
        assert_eq!(value, Value::Float(0.001));
        assert_eq!(remaining, "");

        let (_, (key, value)) = parse_key_value_pair("dfunc:").unwrap();
        assert_eq!(key, "dfunc");
        assert_eq!(value, Value::String(String::new()));
    }

    #[test]
    fn test_parse_section() {
        let input = "[task2]\nmethod = central\nh = 0.1\n[output]\ndata_dir = data";
        let (remaining, (title, map)) = parse_section(input).unwrap();
        assert_eq!(title, "task2");
        assert_eq!(map.len(), 2);
        assert_eq!(map["method"], Value::String("central".to_string()));
        assert_eq!(map["h"], Value::Float(0.1));
        assert_eq!(remaining, "[output]\ndata_dir = data");

        // section without keys
        let (remaining, (title, map)) = parse_section("empty\nnext\nk: v").unwrap();
        assert_eq!(title, "empty");
        assert!(map.is_empty());
        assert_eq!(remaining, "next\nk: v");
    }

    #[test]
    fn test_parse_document() {
        let input = "# matan configuration\n\
                     [general]\n\
                     task = minimize\n\
                     func = sin(x) + x^2\n\
                     a = -2\n\
                     b = 2\n\
                     \n\
                     ; minimization\n\
                     task1\n\
                     method: dichotomy\n\
                     eps: 1e-5\n\
                     [general]\n\
                     b = 3\n";
        let doc = parse_document(input).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc["general"]["func"], Value::String("sin(x) + x^2".to_string()));
        assert_eq!(doc["general"]["a"], Value::Integer(-2));
        assert_eq!(doc["general"]["b"], Value::Integer(3));
        assert_eq!(doc["task1"]["eps"], Value::Float(1e-5));
    }

    #[test]
    fn test_parse_document_edge_cases() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("// only a comment\n").unwrap().is_empty());
        assert!(parse_document("key: value_without_section").is_err());
        assert!(parse_document("[general]\n(broken line)").is_err());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::String("yes".to_string()).as_boolean(), Some(true));
        assert_eq!(Value::Integer(0).as_boolean(), Some(false));
        assert_eq!(Value::Float(0.5).as_boolean(), None);
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::Integer(7).as_integer(), Some(7));
        assert!(Value::Boolean(true).as_string().is_none());
    }
}
