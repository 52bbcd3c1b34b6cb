pub mod redact;

pub use redact::{RedactionLevel, Redactor, redact};
