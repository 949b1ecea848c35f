use crate::error::Result;
use crate::extract::{constructor_dependencies, inject_calls, parameter_list};
use crate::runtime::RuntimeHandle;
use crate::strategy::{classify_scope, classify_type, DiscoveryStrategy};
use async_trait::async_trait;
use depscope_protocol::{DiscoveryMethod, ScriptSource, ServiceRecord};
use regex::Regex;
use std::sync::OnceLock;

/// `@Injectable({...}) export class Name`
fn decorator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"@Injectable\s*\(\s*(?:\{(?P<opts>[^}]*)\})?\s*\)\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][\w$]*)",
        )
        .expect("valid injectable decorator regex")
    })
}

/// Compiled output: `ɵɵdefineInjectable({token: Name, ...})`
fn compiled_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"ɵɵdefineInjectable\(\s*\{\s*token\s*:\s*(?P<name>[A-Za-z_$][\w$]*)(?P<opts>[^}]*)\}")
            .expect("valid compiled injectable regex")
    })
}

/// Factory call site: `new (t || Name)(`
fn factory_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"new\s*\(\s*[\w$]+\s*\|\|\s*(?P<name>[A-Za-z_$][\w$]*)\s*\)\s*\(")
            .expect("valid factory regex")
    })
}

fn provided_in_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"providedIn\s*:\s*['"]?(?P<scope>[A-Za-z_$][\w$]*)"#)
            .expect("valid providedIn regex")
    })
}

/// Scans script text for injectable class declarations
#[derive(Debug, Clone, Default)]
pub struct TextualPatternStrategy;

#[async_trait]
impl DiscoveryStrategy for TextualPatternStrategy {
    fn name(&self) -> &'static str {
        "textual_pattern"
    }

    async fn discover(&self, runtime: &dyn RuntimeHandle) -> Result<Vec<ServiceRecord>> {
        let sources = runtime.script_sources().await?;
        Ok(sources.iter().flat_map(scan_source).collect())
    }
}

/// Records found in one script, in source order
pub fn scan_source(source: &ScriptSource) -> Vec<ServiceRecord> {
    let content = source.content.as_str();
    let mut records = Vec::new();

    let decorators: Vec<_> = decorator_re().captures_iter(content).collect();
    for (i, caps) in decorators.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            continue;
        };
        // The class body runs until the next decorated class
        let body_end = decorators
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let body = &content[whole.end()..body_end];

        let mut deps = body
            .find("constructor")
            .map(|pos| {
                constructor_dependencies(&body[pos..]).unwrap_or_else(|err| {
                    log::debug!("Constructor parse failed for {}: {err}", name.as_str());
                    Vec::new()
                })
            })
            .unwrap_or_default();
        for dep in inject_calls(body) {
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        records.push(build_record(
            name.as_str(),
            caps.name("opts").map(|m| m.as_str()),
            deps,
            source,
        ));
    }

    for caps in compiled_re().captures_iter(content) {
        let Some(name) = caps.name("name") else {
            continue;
        };
        let deps = factory_dependencies(content, name.as_str());
        records.push(build_record(
            name.as_str(),
            caps.name("opts").map(|m| m.as_str()),
            deps,
            source,
        ));
    }

    records
}

/// `new (t || Name)(ɵɵinject(A), ɵɵinject(B))` -> [A, B]
fn factory_dependencies(content: &str, name: &str) -> Vec<String> {
    let Some(found) = factory_re()
        .captures_iter(content)
        .find(|caps| caps.name("name").is_some_and(|m| m.as_str() == name))
        .and_then(|caps| caps.get(0))
    else {
        return Vec::new();
    };

    // The match ends just past the argument list's opening paren
    match parameter_list(&content[found.end() - 1..]) {
        Ok(args) => inject_calls(args),
        Err(err) => {
            log::debug!("Factory parse failed for {name}: {err}");
            Vec::new()
        }
    }
}

fn build_record(
    name: &str,
    opts: Option<&str>,
    dependencies: Vec<String>,
    source: &ScriptSource,
) -> ServiceRecord {
    let provided_in = opts
        .and_then(|o| provided_in_re().captures(o))
        .and_then(|c| c.name("scope"))
        .map(|m| m.as_str());

    let mut record = ServiceRecord::new(
        name,
        classify_type(name),
        classify_scope(provided_in),
        DiscoveryMethod::TextualPattern,
    )
    .with_dependencies(dependencies);
    record.source_hint = source.url.clone();
    record
}
