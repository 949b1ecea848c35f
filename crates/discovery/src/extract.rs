//! Best-effort dependency extraction from constructor signatures and
//! `inject(...)` calls. Failures never abort discovery: callers fall back to
//! an empty dependency list.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no parameter list found")]
    MissingParameterList,

    #[error("unbalanced delimiters near offset {0}")]
    Unbalanced(usize),
}

const PRIMITIVES: [&str; 10] = [
    "string", "number", "boolean", "any", "unknown", "object", "void", "never", "bigint", "symbol",
];

fn inject_decorator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"@Inject\(\s*([A-Za-z_$][\w$.]*)\s*\)").expect("valid inject decorator regex")
    })
}

fn inject_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^\w$])(?:ɵɵ)?inject\(\s*([A-Za-z_$][\w$.]*)")
            .expect("valid inject call regex")
    })
}

/// Dependencies declared by a constructor signature.
///
/// Accepts either a bare parameter list or text containing
/// `constructor(...)`; the first parameter list found is used.
pub fn constructor_dependencies(signature: &str) -> Result<Vec<String>, ExtractionError> {
    let start = signature.find("constructor").unwrap_or(0);
    let params = parameter_list(&signature[start..])?;

    let mut deps = Vec::new();
    for param in split_top_level(params)? {
        if let Some(ty) = parameter_type(param) {
            push_unique(&mut deps, ty);
        }
    }
    Ok(deps)
}

/// Tokens passed to `inject(...)` / `ɵɵinject(...)` anywhere in `text`
pub fn inject_calls(text: &str) -> Vec<String> {
    let mut deps = Vec::new();
    for caps in inject_call_re().captures_iter(text) {
        if let Some(name) = caps.get(1).and_then(|m| normalize_type(m.as_str())) {
            push_unique(&mut deps, name);
        }
    }
    deps
}

/// Contents of the first balanced `(...)` in `text`
pub fn parameter_list(text: &str) -> Result<&str, ExtractionError> {
    let open = text.find('(').ok_or(ExtractionError::MissingParameterList)?;
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    Err(ExtractionError::Unbalanced(open))
}

/// Split at commas that are not nested inside (), <>, [] or {}
pub fn split_top_level(params: &str) -> Result<Vec<&str>, ExtractionError> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut prev = '\0';

    for (offset, ch) in params.char_indices() {
        match ch {
            '(' | '<' | '[' | '{' => depth += 1,
            // `=>` in function types is not a closing bracket
            '>' if prev == '=' => {}
            ')' | '>' | ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ExtractionError::Unbalanced(offset));
                }
            }
            ',' if depth == 0 => {
                parts.push(params[start..offset].trim());
                start = offset + 1;
            }
            _ => {}
        }
        prev = ch;
    }

    if depth != 0 {
        return Err(ExtractionError::Unbalanced(params.len()));
    }

    let last = params[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    Ok(parts.into_iter().filter(|p| !p.is_empty()).collect())
}

/// Type (or `@Inject` token) of one constructor parameter
fn parameter_type(param: &str) -> Option<String> {
    if let Some(caps) = inject_decorator_re().captures(param) {
        return caps.get(1).and_then(|m| normalize_type(m.as_str()));
    }

    let (_, ty) = param.split_once(':')?;
    let ty = ty.split('=').next().unwrap_or(ty);
    let ty = ty
        .split('|')
        .map(str::trim)
        .find(|alt| !matches!(*alt, "null" | "undefined" | ""))?;
    normalize_type(ty)
}

/// `i1.Store<State>[]` -> `Store`; primitives and non-identifiers -> None
fn normalize_type(raw: &str) -> Option<String> {
    let base = raw.split('<').next().unwrap_or(raw);
    let base = base.trim().trim_end_matches("[]").trim();
    let name = base.rsplit('.').next().unwrap_or(base);

    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return None;
    }
    if PRIMITIVES.contains(&name) {
        return None;
    }
    Some(name.to_string())
}

fn push_unique(deps: &mut Vec<String>, name: String) {
    if !deps.contains(&name) {
        deps.push(name);
    }
}
