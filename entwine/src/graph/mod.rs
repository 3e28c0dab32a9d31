//! Dependency graph of a system
//!
//! This module owns everything structural about a system, and nothing that
//! runs:
//!
//! - Declaring dependencies as lists or renaming maps ([`Declaration`])
//! - Normalizing declarations into one canonical shape ([`normalize`])
//! - Rejecting unknown references and cycles up front ([`validate`])
//! - Reversing edges for top-down walks ([`invert`])
//! - A deterministic sequential order for introspection ([`topological_order`])
//!
//! # Design Principles
//!
//! The graph is plain data: maps keyed by [`ComponentName`]. It is checked
//! once, when a system is built, and never mutated afterwards.

mod declaration;
mod error;
mod name;
mod order;
mod validate;

pub use declaration::{invert, normalize, Declaration, Dependencies, Injections};
pub use error::{GraphError, GraphResult};
pub use name::ComponentName;
pub use order::topological_order;
pub use validate::validate;
