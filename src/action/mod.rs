//! Dynamic, type-checked action invocation.
//!
//! # Responsibilities
//! - Describe argument and return types of handler actions (`value.rs`)
//! - Register handler types with their action tables (`handler.rs`)
//! - Validate and run `Handler.Action` calls by name (`binding.rs`)
//!
//! # Data Flow
//! ```text
//! Handler::actions()            → Actions<H> (typed wrappers, built once)
//! HandlerTemplate::new(h)       → erased template shared by every binding
//! ActionBinding::validate(args) → arity + coercion + return checks
//! Prepared::call(instance)      → Vec<Value>
//! ```
//!
//! # Design Decisions
//! - Dispatch tables are built from method signatures at compile time;
//!   nothing is discovered at runtime
//! - Arguments cross the boundary as [`Value`], tagged with a descriptor, so
//!   mismatches report readable "have" and "want" lists

pub mod binding;
pub mod handler;
pub mod value;

pub use binding::{call_by_name, ActionBinding, Prepared};
pub use handler::{Action, Actions, Handler, HandlerTemplate, Instance, IntoAction, Signature};
pub use value::{short_type_name, Kind, Reflect, Repr, TypeDescriptor, Value};
