//! Named route registry and URL building.
//!
//! Values are substituted into capturing segments in declaration order.
//! Each value is checked against the segment it fills so a built URL always
//! routes back to the same route with the same params.
//!
//! Paths are matched raw, so values are never encoded here: a value must
//! already consist of path characters (RFC 3986 `pchar`, with `%XX`
//! escapes). Anything else is rejected rather than producing a URL that
//! would be cut at `?`/`#` or refused as a request URI.

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::error::UrlError;
use crate::routing::params::Params;
use crate::routing::pattern::{Pattern, Segment};
use crate::routing::table::{Route, RouteTable};

/// Name to route mapping. Names are unique.
#[derive(Default)]
pub(crate) struct NamedRoutes {
    by_name: HashMap<String, Arc<Route>>,
}

impl NamedRoutes {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Arc<Route>> {
        self.by_name.get(name)
    }

    pub(crate) fn insert(&mut self, route: Arc<Route>) {
        if let Some(name) = route.name() {
            self.by_name.insert(name.to_string(), route.clone());
        }
    }

    fn lookup(&self, name: &str) -> Result<&Arc<Route>, UrlError> {
        self.get(name)
            .ok_or_else(|| UrlError::UnknownRouteName(name.to_string()))
    }
}

impl RouteTable {
    /// Build the path of a named route from positional values.
    pub fn url_for<V: AsRef<str>>(&self, name: &str, values: &[V]) -> Result<String, UrlError> {
        let route = self.names().lookup(name)?;
        let pattern = route.pattern();

        let expected = pattern.param_count();
        if values.len() != expected {
            return Err(UrlError::ParamCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        substitute(pattern, values.iter().map(|v| v.as_ref()))
    }

    /// Build the path of a named route from a name to value mapping.
    pub fn url_for_params(&self, name: &str, params: &Params) -> Result<String, UrlError> {
        let route = self.names().lookup(name)?;
        let pattern = route.pattern();

        let expected = pattern.param_count();
        if params.len() != expected {
            return Err(UrlError::ParamCountMismatch {
                expected,
                actual: params.len(),
            });
        }
        if let Some(missing) = pattern.param_names().find(|n| !params.contains(n)) {
            return Err(rejected(missing, "", "no value supplied"));
        }
        substitute(
            pattern,
            pattern.param_names().map(|n| params.get(n).unwrap_or_default()),
        )
    }
}

fn substitute<'v>(
    pattern: &Pattern,
    mut values: impl Iterator<Item = &'v str>,
) -> Result<String, UrlError> {
    let mut url = String::new();

    for segment in pattern.segments() {
        url.push('/');
        match segment {
            Segment::Static(literal) => url.push_str(literal),
            Segment::Wildcard { name } => {
                let value = values.next().unwrap_or_default();
                check_chars(name, value, true)?;
                url.push_str(value);
            }
            Segment::Param { name } => {
                let value = values.next().unwrap_or_default();
                check_component(name, value)?;
                url.push_str(value);
            }
            Segment::Regex { name, source, regex } => {
                let value = values.next().unwrap_or_default();
                check_component(name, value)?;
                if !regex.is_match(value) {
                    return Err(rejected(name, value, format!("does not match `{source}`")));
                }
                url.push_str(value);
            }
        }
    }

    if url.is_empty() {
        url.push('/');
    }
    Ok(url)
}

fn check_component(name: &str, value: &str) -> Result<(), UrlError> {
    if value.is_empty() {
        return Err(rejected(name, value, "empty value"));
    }
    if value.contains('/') {
        return Err(rejected(name, value, "contains a path separator"));
    }
    check_chars(name, value, false)
}

/// Every byte must be a path character or part of a `%XX` escape.
fn check_chars(name: &str, value: &str, allow_slash: bool) -> Result<(), UrlError> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
                if !escaped {
                    return Err(rejected(name, value, "malformed percent escape"));
                }
                i += 3;
                continue;
            }
            b'/' if allow_slash => {}
            b if is_pchar(b) => {}
            b => {
                return Err(rejected(
                    name,
                    value,
                    format!("`{}` is not allowed in a path", char::from(b).escape_default()),
                ))
            }
        }
        i += 1;
    }
    Ok(())
}

fn is_pchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-._~!$&'()*+,;=:@".contains(&b)
}

fn rejected(param: &str, value: &str, reason: impl Into<String>) -> UrlError {
    UrlError::ParamValidationFailed {
        param: param.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}
