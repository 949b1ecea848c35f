mod builtin;
mod introspection;
mod textual;

pub use builtin::BuiltinEnumerationStrategy;
pub use introspection::IntrospectionStrategy;
pub use textual::{scan_source, TextualPatternStrategy};
