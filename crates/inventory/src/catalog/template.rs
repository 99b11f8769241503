//! URI template expansion for advertised catalog links
//!
//! Implements the parts of RFC 6570 that HAL servers emit: simple `{var}`,
//! reserved `{+var}`, fragment `{#var}`, path `{/var}`, label `{.var}`,
//! path-parameter `{;var}` and form-style query `{?a,b}` / `{&a,b}`.
//! Prefix (`:n`) and explode (`*`) modifiers are accepted and ignored.

use anyhow::{Context, Result, bail};
use url::Url;

/// Characters RFC 3986 reserves, kept verbatim by `+` and `#` expansion
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

/// An advertised, possibly templated, URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate(String);

impl UriTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the template contains any `{...}` expression
    pub fn is_templated(&self) -> bool {
        self.0.contains('{')
    }

    /// Expand the template into an absolute URL
    ///
    /// Variables missing from `vars` are dropped. A link that is not
    /// templated gets `vars` appended as query parameters instead, since it
    /// offers no place to put them.
    pub fn expand(&self, vars: &[(String, String)]) -> Result<Url> {
        if !self.is_templated() {
            let mut url = Url::parse(&self.0)
                .with_context(|| format!("Invalid capability link: {}", self.0))?;
            if !vars.is_empty() {
                let mut query = url.query_pairs_mut();
                for (name, value) in vars {
                    query.append_pair(name, value);
                }
            }
            return Ok(url);
        }

        let mut expanded = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find('{') {
            expanded.push_str(&rest[..start]);
            let Some(len) = rest[start..].find('}') else {
                bail!("Unterminated expression in URI template: {}", self.0);
            };
            expanded.push_str(&expand_expression(&rest[start + 1..start + len], vars));
            rest = &rest[start + len + 1..];
        }
        expanded.push_str(rest);

        Url::parse(&expanded).with_context(|| format!("Expanded URI is invalid: {}", expanded))
    }
}

impl std::fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn split_operator(expression: &str) -> (Option<char>, &str) {
    match expression.chars().next() {
        Some(op @ ('+' | '#' | '.' | '/' | ';' | '?' | '&')) => (Some(op), &expression[1..]),
        _ => (None, expression),
    }
}

/// Strip `:n` prefix and `*` explode modifiers from a varspec
fn var_name(spec: &str) -> &str {
    let spec = spec.trim().trim_end_matches('*');
    spec.split(':').next().unwrap_or(spec)
}

fn lookup<'a>(vars: &'a [(String, String)], name: &str) -> Option<&'a str> {
    vars.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn encode(value: &str, allow_reserved: bool) -> String {
    if !allow_reserved {
        return urlencoding::encode(value).into_owned();
    }
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if RESERVED.contains(ch) {
            out.push(ch);
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

fn expand_expression(expression: &str, vars: &[(String, String)]) -> String {
    let (op, list) = split_operator(expression);

    // (prefix, separator, named, allow reserved)
    let (first, sep, named, allow_reserved) = match op {
        Some('+') => ("", ",", false, true),
        Some('#') => ("#", ",", false, true),
        Some('.') => (".", ".", false, false),
        Some('/') => ("/", "/", false, false),
        Some(';') => (";", ";", true, false),
        Some('?') => ("?", "&", true, false),
        Some('&') => ("&", "&", true, false),
        _ => ("", ",", false, false),
    };

    let parts: Vec<String> = list
        .split(',')
        .filter_map(|spec| {
            let name = var_name(spec);
            let value = lookup(vars, name)?;
            let encoded = encode(value, allow_reserved);
            Some(match (named, op) {
                (false, _) => encoded,
                (true, Some(';')) if value.is_empty() => name.to_string(),
                (true, _) => format!("{}={}", name, encoded),
            })
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}{}", first, parts.join(sep))
    }
}
