use crate::error::Result;
use crate::runtime::RuntimeHandle;
use async_trait::async_trait;
use depscope_protocol::{Scope, ServiceRecord, ServiceType};

/// Well-known services supplied by the framework itself
pub const BUILTIN_SERVICES: [&str; 14] = [
    "HttpClient",
    "Router",
    "ActivatedRoute",
    "Location",
    "DomSanitizer",
    "Title",
    "Meta",
    "NgZone",
    "ChangeDetectorRef",
    "ApplicationRef",
    "Renderer2",
    "ElementRef",
    "Injector",
    "FormBuilder",
];

/// One independent way of finding services.
///
/// Strategies share nothing but the runtime capability; an error from one
/// never affects the others.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn discover(&self, runtime: &dyn RuntimeHandle) -> Result<Vec<ServiceRecord>>;
}

pub fn classify_type(token: &str) -> ServiceType {
    let token = token.trim();
    if token.is_empty() || token.starts_with('(') || token.contains(char::is_whitespace) {
        ServiceType::Unknown
    } else if BUILTIN_SERVICES.contains(&token) {
        ServiceType::BuiltIn
    } else {
        ServiceType::Custom
    }
}

/// Maps a `providedIn` value to a scope; surrounding quotes are ignored
pub fn classify_scope(provided_in: Option<&str>) -> Scope {
    let Some(raw) = provided_in
        .map(|s| s.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|s| !s.is_empty())
    else {
        return Scope::Unknown;
    };

    match raw.to_ascii_lowercase().as_str() {
        "root" | "platform" | "any" => Scope::Root,
        "module" => Scope::Module,
        "component" => Scope::Component,
        _ if raw.ends_with("Module") => Scope::Module,
        _ if raw.ends_with("Component") => Scope::Component,
        _ => Scope::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_type() {
        assert_eq!(classify_type("HttpClient"), ServiceType::BuiltIn);
        assert_eq!(classify_type("UserService"), ServiceType::Custom);
        assert_eq!(classify_type(""), ServiceType::Unknown);
        assert_eq!(classify_type("(anonymous)"), ServiceType::Unknown);
        assert_eq!(classify_type("InjectionToken app config"), ServiceType::Unknown);
    }

    #[test]
    fn test_classify_scope() {
        assert_eq!(classify_scope(Some("root")), Scope::Root);
        assert_eq!(classify_scope(Some("platform")), Scope::Root);
        assert_eq!(classify_scope(Some("any")), Scope::Root);
        assert_eq!(classify_scope(Some("'any'")), Scope::Root);
        assert_eq!(classify_scope(Some("\"AdminModule\"")), Scope::Module);
        assert_eq!(classify_scope(Some("''")), Scope::Unknown);
        assert_eq!(classify_scope(Some("AdminModule")), Scope::Module);
        assert_eq!(classify_scope(Some("module")), Scope::Module);
        assert_eq!(classify_scope(Some("HeaderComponent")), Scope::Component);
        assert_eq!(classify_scope(Some("  ")), Scope::Unknown);
        assert_eq!(classify_scope(None), Scope::Unknown);
    }
}
