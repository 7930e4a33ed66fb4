//! Shared-state capabilities of handler types.
//!
//! # Responsibilities
//! - Let a handler type declare which shared framework values it embeds
//! - Answer "does this instance embed type X" questions
//! - Push a shared value (session, request context) into a fresh instance
//!
//! # Design Decisions
//! - Embedding is declared, not discovered: each field is an accessor
//!   registered in [`Handler::capabilities`](crate::Handler::capabilities)
//! - Resolution is a single hop by field name; nested state is exposed by
//!   registering an accessor that reaches it directly
//! - A missing field fails with `NoEmbeddedField`, never loops

use std::any::{type_name, Any};
use std::collections::HashMap;

use tracing::warn;

use crate::action::handler::{HandlerTemplate, Instance};
use crate::action::value::short_type_name;
use crate::error::CapabilityError;

/// A shared value handed back because no field accepted it.
type Rejected = Box<dyn Any + Send>;

trait Slot<H>: Send + Sync {
    fn field(&self) -> &str;
    fn type_name(&self) -> &'static str;
    fn assign(&self, handler: &mut H, value: Box<dyn Any + Send>) -> Result<(), Rejected>;
}

struct Field<H, S> {
    field: &'static str,
    access: fn(&mut H) -> &mut S,
}

impl<H: 'static, S: Any + Send> Slot<H> for Field<H, S> {
    fn field(&self) -> &str {
        self.field
    }

    fn type_name(&self) -> &'static str {
        type_name::<S>()
    }

    fn assign(&self, handler: &mut H, value: Box<dyn Any + Send>) -> Result<(), Rejected> {
        let value = value.downcast::<S>()?;
        *(self.access)(handler) = *value;
        Ok(())
    }
}

/// Embedded shared-state fields of handler type `H`.
pub struct Capabilities<H> {
    slots: Vec<Box<dyn Slot<H>>>,
}

impl<H: 'static> Capabilities<H> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Declare a field of type `S`, named after `S`'s unqualified type name.
    pub fn embed<S: Any + Send>(&mut self, access: fn(&mut H) -> &mut S) -> &mut Self {
        self.embed_as(short_type_name(type_name::<S>()), access)
    }

    /// Declare a field of type `S` under an explicit name.
    pub fn embed_as<S: Any + Send>(
        &mut self,
        field: &'static str,
        access: fn(&mut H) -> &mut S,
    ) -> &mut Self {
        self.slots.retain(|slot| slot.field() != field);
        self.slots.push(Box::new(Field { field, access }));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.slots.iter().map(|slot| (slot.field(), slot.type_name()))
    }

    fn find(&self, field: &str) -> Option<&dyn Slot<H>> {
        self.slots
            .iter()
            .find(|slot| slot.field() == field)
            .map(|slot| slot.as_ref())
    }

    pub(crate) fn embeds(&self, field: &str, type_name: &str) -> bool {
        self.find(field).is_some_and(|slot| slot.type_name() == type_name)
    }

    pub(crate) fn assign(
        &self,
        handler: &mut H,
        field: &str,
        value: Box<dyn Any + Send>,
    ) -> Result<(), Box<dyn Any + Send>> {
        match self.find(field) {
            Some(slot) => slot.assign(handler, value),
            None => Err(value),
        }
    }
}

/// Capability queries against the handler types of a routing table.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityResolver<'a> {
    handlers: &'a HashMap<String, HandlerTemplate>,
}

impl<'a> CapabilityResolver<'a> {
    pub(crate) fn new(handlers: &'a HashMap<String, HandlerTemplate>) -> Self {
        Self { handlers }
    }

    /// True if `instance` is of type `qualified`, or declares a field named
    /// after `qualified`'s unqualified name whose type is `qualified`.
    pub fn has_embedded(&self, instance: &Instance, qualified: &str) -> bool {
        if instance.type_name() == qualified {
            return true;
        }
        instance
            .handler()
            .erased()
            .embeds(short_type_name(qualified), qualified)
    }

    /// True if a handler template of exactly `T` is registered.
    pub fn is_known_type<T: Any>(&self, _value: &T) -> bool {
        self.handlers.values().any(HandlerTemplate::is::<T>)
    }

    /// Store `shared` into `target`: replacing it outright if it is the
    /// handler type itself, else through the embedded field named after
    /// `S`'s unqualified type name.
    pub fn inject_shared<S: Any + Send>(
        &self,
        target: &mut Instance,
        shared: S,
    ) -> Result<(), CapabilityError> {
        let shared_name = type_name::<S>();
        let handler = target.handler().clone();
        let erased = handler.erased();

        let outcome = if handler.is::<S>() {
            erased.replace(target.value_mut(), Box::new(shared))
        } else {
            erased.assign(target.value_mut(), short_type_name(shared_name), Box::new(shared))
        };

        outcome.map_err(|_| {
            warn!(
                target_type = %handler.type_name(),
                shared = %shared_name,
                "Shared state not embedded"
            );
            CapabilityError::NoEmbeddedField {
                target: handler.type_name().to_string(),
                shared: shared_name.to_string(),
            }
        })
    }
}
