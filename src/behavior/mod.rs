//! Behavior definition subsystem.
//!
//! # Data Flow
//! ```text
//! behavior file (INI-style text)
//!     → parser.rs (sections + properties, line indexes kept)
//!     → compiler.rs (typed BehaviorSet, cookie grammar, validation)
//!     → routing::Registry::replace (published to request handlers)
//! ```
//!
//! # Design Decisions
//! - Parser has no knowledge of keys; all semantics live in the compiler
//! - Compilation is all-or-nothing, first error wins
//! - Unknown keys are hard errors, there is no forward compatibility

pub mod compiler;
pub mod cookie;
pub mod duration;
pub mod model;
pub mod parser;

pub use compiler::{compile, CompileError};
pub use cookie::{Cookie, SameSite};
pub use model::{Behavior, BehaviorSet, HttpMethod, ResponseBehavior};
pub use parser::{parse, parse_str, ParseError, Property, Section};
