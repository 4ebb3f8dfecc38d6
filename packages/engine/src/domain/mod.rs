pub mod library;
pub mod pattern_file;
pub mod patterns;

pub use library::PatternLibrary;
pub use patterns::{Pattern, BUILTIN_PATTERNS};
