//! Route pattern compilation.
//!
//! # Grammar
//! ```text
//! /literal          static, compared exactly
//! /:name            param, any non-empty component
//! /:name(regex)     regex-param, regex anchored to the whole component
//! /{name:regex}     regex-param, alternate spelling
//! /*name            wildcard, final component only, captures the remainder
//! ```
//!
//! Components are split on `/` outside of parentheses and braces, so a
//! regex such as `[^/]+` or `\d{2,4}` stays inside its component.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::routing::error::CompileError;

/// One path component's matching rule.
#[derive(Debug, Clone)]
pub enum Segment {
    Static(String),
    Param { name: String },
    Regex { name: String, source: String, regex: Regex },
    Wildcard { name: String },
}

impl Segment {
    /// Parameter name for capturing segments, `None` for statics.
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param { name }
            | Segment::Regex { name, .. }
            | Segment::Wildcard { name } => Some(name),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Segment::Static(_))
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
    has_wildcard: bool,
    static_prefix_len: usize,
}

impl Pattern {
    /// Compile a pattern string. Fails fast; no partial pattern is ever returned.
    pub fn compile(pattern: &str) -> Result<Self, CompileError> {
        let mut segments = Vec::new();
        let mut seen = HashSet::new();

        for component in split_components(pattern)? {
            if matches!(segments.last(), Some(Segment::Wildcard { .. })) {
                return Err(CompileError::InvalidWildcardPosition {
                    pattern: pattern.to_string(),
                });
            }

            let segment = parse_component(pattern, component)?;
            if let Some(name) = segment.name() {
                if !seen.insert(name.to_string()) {
                    return Err(CompileError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
            }
            segments.push(segment);
        }

        let has_wildcard = matches!(segments.last(), Some(Segment::Wildcard { .. }));
        let static_prefix_len = segments.iter().take_while(|s| s.is_static()).count();

        Ok(Self {
            raw: pattern.to_string(),
            segments,
            has_wildcard,
            static_prefix_len,
        })
    }

    /// The pattern string as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        self.has_wildcard
    }

    /// Number of leading static segments.
    pub fn static_prefix_len(&self) -> usize {
        self.static_prefix_len
    }

    /// Segments a path must supply before any wildcard.
    pub fn fixed_len(&self) -> usize {
        if self.has_wildcard {
            self.segments.len() - 1
        } else {
            self.segments.len()
        }
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::name)
    }

    pub fn param_count(&self) -> usize {
        self.param_names().count()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split on `/` at bracket depth zero. A single leading `/` is optional.
fn split_components(pattern: &str) -> Result<Vec<&str>, CompileError> {
    let body = pattern.strip_prefix('/').unwrap_or(pattern);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_class = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if depth > 0 => in_class = true,
            ']' if in_class => in_class = false,
            _ if in_class => {}
            '(' | '{' => depth += 1,
            ')' | '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CompileError::invalid(pattern, "unbalanced brackets"))?;
            }
            '/' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 || in_class {
        return Err(CompileError::invalid(pattern, "unbalanced brackets"));
    }
    parts.push(&body[start..]);

    if parts.iter().any(|p| p.is_empty()) {
        return Err(CompileError::invalid(pattern, "empty path component"));
    }
    Ok(parts)
}

fn parse_component(pattern: &str, component: &str) -> Result<Segment, CompileError> {
    if let Some(name) = component.strip_prefix('*') {
        return Ok(Segment::Wildcard {
            name: param_name(pattern, name)?,
        });
    }

    if let Some(rest) = component.strip_prefix(':') {
        return match rest.find('(') {
            Some(open) => {
                let source = rest[open + 1..].strip_suffix(')').ok_or_else(|| {
                    CompileError::invalid(pattern, format!("`{component}` has trailing text after its regex"))
                })?;
                regex_segment(pattern, &rest[..open], source)
            }
            None => Ok(Segment::Param {
                name: param_name(pattern, rest)?,
            }),
        };
    }

    if let Some(inner) = component.strip_prefix('{') {
        let inner = inner.strip_suffix('}').ok_or_else(|| {
            CompileError::invalid(pattern, format!("`{component}` is missing its closing brace"))
        })?;
        let (name, source) = inner.split_once(':').ok_or_else(|| {
            CompileError::invalid(pattern, format!("`{component}` must be written `{{name:regex}}`"))
        })?;
        return regex_segment(pattern, name, source);
    }

    Ok(Segment::Static(component.to_string()))
}

fn regex_segment(pattern: &str, name: &str, source: &str) -> Result<Segment, CompileError> {
    let name = param_name(pattern, name)?;
    if source.is_empty() {
        return Err(CompileError::invalid(pattern, format!("empty regex for `{name}`")));
    }
    let regex = Regex::new(&format!("^(?:{source})$"))
        .map_err(|e| CompileError::invalid(pattern, format!("bad regex for `{name}`: {e}")))?;
    Ok(Segment::Regex {
        name,
        source: source.to_string(),
        regex,
    })
}

fn param_name(pattern: &str, name: &str) -> Result<String, CompileError> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name.to_string())
    } else {
        Err(CompileError::invalid(pattern, format!("invalid parameter name `{name}`")))
    }
}
