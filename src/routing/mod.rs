//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → registry.rs (load active set snapshot)
//!     → scan routes in declaration order, exact method + path
//!     → budget.rs (take one unit from a finite repeat budget)
//!     → Dispatch: matched response, or 404 + default fallback
//!
//! Reload:
//!     BehaviorSet (freshly compiled)
//!     → Registry::replace (atomic swap, budgets start fresh)
//! ```
//!
//! # Design Decisions
//! - No wildcard or prefix matching, paths compare byte for byte
//! - First declaration wins; exhausted routes are removed immediately
//! - A dispatch never blocks on a reload and never sees a mixed set

pub mod budget;
pub mod registry;

pub use budget::{Grant, RepeatBudget};
pub use registry::{Dispatch, Registry, RegistrySnapshot};
