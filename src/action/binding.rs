//! Deferred, type-checked calls of `Handler.Action`.
//!
//! # Data Flow
//! ```text
//! ActionBinding (from a route)
//!     → resolve(): template present? action declared?
//!     → validate(args, returns): arity, per-argument coercion, return shape
//!     → Prepared::call(instance): run on a live instance
//! ```

use crate::action::handler::{HandlerTemplate, Instance};
use crate::action::value::Value;
use crate::error::InvocationError;

/// The compiled association between a route and one handler action.
#[derive(Clone, Debug)]
pub struct ActionBinding {
    handler: String,
    action: String,
    template: Option<HandlerTemplate>,
}

impl ActionBinding {
    pub fn new(
        handler: impl Into<String>,
        action: impl Into<String>,
        template: Option<HandlerTemplate>,
    ) -> Self {
        Self {
            handler: handler.into(),
            action: action.into(),
            template,
        }
    }

    /// `(handler type name, action name)`.
    pub fn name(&self) -> (&str, &str) {
        (&self.handler, &self.action)
    }

    pub fn template(&self) -> Option<&HandlerTemplate> {
        self.template.as_ref()
    }

    /// A fresh instance of the bound handler type, once the action is known to exist.
    pub fn resolve(&self) -> Result<Instance, InvocationError> {
        let template = self.checked_template(&self.action)?;
        Ok(template.instantiate())
    }

    /// Check `args` against the action's parameters, converting where allowed.
    ///
    /// When `returns` is non-empty it lists the expected fully qualified
    /// return type names; an empty slice skips the return check.
    pub fn validate(
        &self,
        args: Vec<Value>,
        returns: &[&str],
    ) -> Result<Prepared<'_>, InvocationError> {
        let template = self.checked_template(&self.action)?;
        prepare(template, &self.action, args, returns)
    }

    /// Resolve, validate and run the action on a fresh instance.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Vec<Value>, InvocationError> {
        let mut instance = self.resolve()?;
        self.invoke_on(&mut instance, args)
    }

    /// Validate and run the action on an instance the caller prepared,
    /// for example after injecting shared state into it.
    pub fn invoke_on(
        &self,
        instance: &mut Instance,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, InvocationError> {
        self.validate(args, &[])?.call(instance)
    }

    fn checked_template(&self, action: &str) -> Result<&HandlerTemplate, InvocationError> {
        let template = self.template.as_ref().ok_or_else(|| InvocationError::HandlerInvalid {
            handler: self.handler.clone(),
            action: action.to_string(),
        })?;
        if !template.has_action(action) {
            return Err(InvocationError::ActionUndefined {
                handler: self.handler.clone(),
                action: action.to_string(),
            });
        }
        Ok(template)
    }
}

/// Validate and run any action of `instance`'s type by name.
pub fn call_by_name(
    instance: &mut Instance,
    action: &str,
    args: Vec<Value>,
    returns: &[&str],
) -> Result<Vec<Value>, InvocationError> {
    let template = instance.handler().clone();
    if !template.has_action(action) {
        return Err(InvocationError::ActionUndefined {
            handler: template.name().to_string(),
            action: action.to_string(),
        });
    }
    prepare(&template, action, args, returns)?.call(instance)
}

fn prepare<'a>(
    template: &'a HandlerTemplate,
    action: &'a str,
    args: Vec<Value>,
    returns: &[&str],
) -> Result<Prepared<'a>, InvocationError> {
    let handler = template.name();
    let signature = template
        .signature(action)
        .ok_or_else(|| InvocationError::ActionUndefined {
            handler: handler.to_string(),
            action: action.to_string(),
        })?;

    let have: Vec<String> = args.iter().map(|arg| arg.type_name().to_string()).collect();
    let want = signature.param_names();
    if args.len() != signature.arity() {
        return Err(InvocationError::ArityMismatch {
            handler: handler.to_string(),
            action: action.to_string(),
            have,
            want,
        });
    }

    let mut accepted = Vec::with_capacity(args.len());
    for (position, (arg, param)) in args.into_iter().zip(&signature.params).enumerate() {
        match (param.accept)(arg) {
            Ok(value) => accepted.push(value),
            Err(_) => {
                return Err(InvocationError::ArgumentTypeMismatch {
                    handler: handler.to_string(),
                    action: action.to_string(),
                    position,
                    have,
                    want,
                })
            }
        }
    }

    if !returns.is_empty() {
        let have = signature.return_names();
        let want: Vec<String> = returns.iter().map(|name| name.to_string()).collect();
        if have.len() != want.len() {
            return Err(InvocationError::ReturnArityMismatch {
                handler: handler.to_string(),
                action: action.to_string(),
                have,
                want,
            });
        }
        if let Some(position) = have.iter().zip(&want).position(|(h, w)| h != w) {
            return Err(InvocationError::ReturnTypeMismatch {
                handler: handler.to_string(),
                action: action.to_string(),
                position,
                have,
                want,
            });
        }
    }

    Ok(Prepared {
        template,
        action,
        args: accepted,
    })
}

/// A validated call, ready to run against an instance of the bound type.
#[derive(Debug)]
pub struct Prepared<'a> {
    template: &'a HandlerTemplate,
    action: &'a str,
    args: Vec<Value>,
}

impl Prepared<'_> {
    /// Arguments after coercion to the declared parameter types.
    pub fn arguments(&self) -> &[Value] {
        &self.args
    }

    pub fn call(self, instance: &mut Instance) -> Result<Vec<Value>, InvocationError> {
        let invalid = || InvocationError::HandlerInvalid {
            handler: self.template.name().to_string(),
            action: self.action.to_string(),
        };
        if !instance.handler().same_type(self.template) {
            return Err(invalid());
        }
        self.template
            .erased()
            .call(instance.value_mut(), self.action, self.args)
            .ok_or_else(invalid)
    }
}
