//! Handler types and their statically registered action tables.
//!
//! A handler type lists its actions once, as plain methods taking `&mut self`.
//! Each method is wrapped into an [`Action`] exposing its parameter and return
//! descriptors and a boxed-argument call, so a route target such as
//! `"Items.Show"` can be checked and invoked by name.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::action::value::{short_type_name, Kind, Reflect, TypeDescriptor, Value};
use crate::capability::Capabilities;

/// A type-erased handler instance.
pub(crate) type AnyHandler = dyn Any + Send + Sync + 'static;

/// A type whose actions can be bound to routes.
///
/// ```
/// use route_dispatch::{Actions, Handler};
///
/// #[derive(Default)]
/// struct Items;
///
/// impl Items {
///     fn show(&mut self, id: String) -> String {
///         format!("item {id}")
///     }
/// }
///
/// impl Handler for Items {
///     fn actions(actions: &mut Actions<Self>) {
///         actions.add("Show", Items::show);
///     }
/// }
/// ```
pub trait Handler: Default + Send + Sync + 'static {
    /// Register the actions this type exposes.
    fn actions(actions: &mut Actions<Self>);

    /// Register the shared-state fields this type embeds.
    fn capabilities(_capabilities: &mut Capabilities<Self>) {}

    /// Name used in route targets. Defaults to the unqualified type name.
    fn name() -> &'static str {
        short_type_name(type_name::<Self>())
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Param {
    pub(crate) ty: TypeDescriptor,
    pub(crate) accept: fn(Value) -> Result<Value, Value>,
}

impl Param {
    fn of<P: Reflect>() -> Self {
        Self {
            ty: TypeDescriptor::of::<P>(),
            accept: accept::<P>,
        }
    }
}

/// Argument compatibility, in order: exact type, capability, same scalar kind.
fn accept<P: Reflect>(value: Value) -> Result<Value, Value> {
    if value.is::<P>() {
        return Ok(value);
    }
    if P::KIND == Kind::Capability {
        return P::adopt(value).map(Value::new);
    }
    if P::KIND.is_scalar() && P::KIND == value.kind() {
        if let Some(converted) = value.repr().and_then(P::from_repr) {
            return Ok(Value::new(converted));
        }
    }
    Err(value)
}

/// Declared parameter and return types of an action.
#[derive(Clone)]
pub struct Signature {
    pub(crate) params: Vec<Param>,
    pub(crate) returns: Vec<TypeDescriptor>,
}

impl Signature {
    pub fn params(&self) -> Vec<TypeDescriptor> {
        self.params.iter().map(|p| p.ty).collect()
    }

    pub fn returns(&self) -> &[TypeDescriptor] {
        &self.returns
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn param_names(&self) -> Vec<String> {
        self.params().iter().map(|t| t.name().to_string()).collect()
    }

    pub(crate) fn return_names(&self) -> Vec<String> {
        self.returns.iter().map(|t| t.name().to_string()).collect()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("params", &self.params())
            .field("returns", &self.returns)
            .finish()
    }
}

type ActionFn<H> = Box<dyn Fn(&mut H, Vec<Value>) -> Option<Vec<Value>> + Send + Sync>;

/// One callable member of a handler type.
pub struct Action<H> {
    signature: Signature,
    call: ActionFn<H>,
}

impl<H> Action<H> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// `None` if an argument is not exactly the declared parameter type.
    pub(crate) fn call(&self, handler: &mut H, args: Vec<Value>) -> Option<Vec<Value>> {
        (self.call)(handler, args)
    }
}

/// Conversion of a method `fn(&mut H, A, B, ..) -> R` into an [`Action`].
pub trait IntoAction<H, Args, Ret> {
    fn into_action(self) -> Action<H>;
}

/// Implement `IntoAction` for methods of each arity.
macro_rules! action_tuple ({ $($T:ident),* } => {
    impl<H, Func, $($T,)* Ret> IntoAction<H, ($($T,)*), Ret> for Func
    where
        H: 'static,
        Func: Fn(&mut H, $($T),*) -> Ret + Send + Sync + 'static,
        $($T: Reflect,)*
        Ret: Reflect,
    {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        fn into_action(self) -> Action<H> {
            Action {
                signature: Signature {
                    params: vec![$(Param::of::<$T>()),*],
                    returns: Ret::return_types(),
                },
                call: Box::new(move |handler: &mut H, args: Vec<Value>| {
                    let mut args = args.into_iter();
                    $(let $T = args.next()?.downcast::<$T>().ok()?;)*
                    Some((self)(handler, $($T),*).into_returns())
                }),
            }
        }
    }
});

#[rustfmt::skip]
mod arities {
    use super::*;

    action_tuple!();
    action_tuple!(A);
    action_tuple!(A, B);
    action_tuple!(A, B, C);
    action_tuple!(A, B, C, D);
    action_tuple!(A, B, C, D, E);
    action_tuple!(A, B, C, D, E, F);
    action_tuple!(A, B, C, D, E, F, G);
    action_tuple!(A, B, C, D, E, F, G, I);
}

/// Action table of one handler type, keyed by action name.
pub struct Actions<H> {
    entries: HashMap<String, Action<H>>,
}

impl<H: 'static> Actions<H> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `action` under `name`, replacing any earlier entry.
    pub fn add<F, Args, Ret>(&mut self, name: &str, action: F) -> &mut Self
    where
        F: IntoAction<H, Args, Ret>,
    {
        self.entries.insert(name.to_string(), action.into_action());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Action<H>> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Object-safe view of a registered handler type.
pub(crate) trait ErasedHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn type_name(&self) -> &'static str;
    fn handler_type(&self) -> TypeId;
    fn template(&self) -> &AnyHandler;
    fn signature(&self, action: &str) -> Option<&Signature>;
    fn action_names(&self) -> Vec<&str>;
    fn instantiate(&self) -> Box<AnyHandler>;
    fn call(&self, instance: &mut AnyHandler, action: &str, args: Vec<Value>) -> Option<Vec<Value>>;
    fn embeds(&self, field: &str, type_name: &str) -> bool;
    /// Overwrite the whole instance with `value`, which must be the handler type.
    fn replace(
        &self,
        instance: &mut AnyHandler,
        value: Box<dyn Any + Send>,
    ) -> Result<(), Box<dyn Any + Send>>;
    /// Overwrite the embedded field `field` with `value`.
    fn assign(
        &self,
        instance: &mut AnyHandler,
        field: &str,
        value: Box<dyn Any + Send>,
    ) -> Result<(), Box<dyn Any + Send>>;
}

struct Registered<H: Handler> {
    template: H,
    actions: Actions<H>,
    capabilities: Capabilities<H>,
}

impl<H: Handler> ErasedHandler for Registered<H> {
    fn name(&self) -> &'static str {
        H::name()
    }

    fn type_name(&self) -> &'static str {
        type_name::<H>()
    }

    fn handler_type(&self) -> TypeId {
        TypeId::of::<H>()
    }

    fn template(&self) -> &AnyHandler {
        &self.template
    }

    fn signature(&self, action: &str) -> Option<&Signature> {
        self.actions.get(action).map(Action::signature)
    }

    fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.actions.names().collect();
        names.sort_unstable();
        names
    }

    fn instantiate(&self) -> Box<AnyHandler> {
        Box::new(H::default())
    }

    fn call(
        &self,
        instance: &mut AnyHandler,
        action: &str,
        args: Vec<Value>,
    ) -> Option<Vec<Value>> {
        let handler = instance.downcast_mut::<H>()?;
        self.actions.get(action)?.call(handler, args)
    }

    fn embeds(&self, field: &str, type_name: &str) -> bool {
        self.capabilities.embeds(field, type_name)
    }

    fn replace(
        &self,
        instance: &mut AnyHandler,
        value: Box<dyn Any + Send>,
    ) -> Result<(), Box<dyn Any + Send>> {
        let value = value.downcast::<H>()?;
        match instance.downcast_mut::<H>() {
            Some(handler) => {
                *handler = *value;
                Ok(())
            }
            None => Err(value),
        }
    }

    fn assign(
        &self,
        instance: &mut AnyHandler,
        field: &str,
        value: Box<dyn Any + Send>,
    ) -> Result<(), Box<dyn Any + Send>> {
        match instance.downcast_mut::<H>() {
            Some(handler) => self.capabilities.assign(handler, field, value),
            None => Err(value),
        }
    }
}

/// A registered handler type: its representative instance plus the action
/// and capability tables built from it. Cheap to clone.
#[derive(Clone)]
pub struct HandlerTemplate {
    inner: Arc<dyn ErasedHandler>,
}

impl HandlerTemplate {
    pub fn new<H: Handler>(template: H) -> Self {
        let mut actions = Actions::new();
        H::actions(&mut actions);
        let mut capabilities = Capabilities::new();
        H::capabilities(&mut capabilities);

        Self {
            inner: Arc::new(Registered {
                template,
                actions,
                capabilities,
            }),
        }
    }

    /// Name used in route targets.
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// Fully qualified type name.
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.handler_type() == TypeId::of::<T>()
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.inner.signature(action).is_some()
    }

    pub fn signature(&self, action: &str) -> Option<&Signature> {
        self.inner.signature(action)
    }

    /// Action names, sorted.
    pub fn actions(&self) -> Vec<&str> {
        self.inner.action_names()
    }

    /// The representative instance, for introspection only.
    pub fn template<H: Handler>(&self) -> Option<&H> {
        self.inner.template().downcast_ref::<H>()
    }

    /// A fresh, default-constructed instance to run an action on.
    pub fn instantiate(&self) -> Instance {
        Instance {
            value: self.inner.instantiate(),
            handler: self.clone(),
        }
    }

    pub(crate) fn erased(&self) -> &dyn ErasedHandler {
        &*self.inner
    }

    pub(crate) fn same_type(&self, other: &HandlerTemplate) -> bool {
        self.inner.handler_type() == other.inner.handler_type()
    }
}

impl fmt::Debug for HandlerTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTemplate")
            .field("name", &self.name())
            .field("type", &self.type_name())
            .field("actions", &self.actions())
            .finish()
    }
}

/// A live handler instance an action runs against.
pub struct Instance {
    value: Box<AnyHandler>,
    handler: HandlerTemplate,
}

impl Instance {
    pub fn handler(&self) -> &HandlerTemplate {
        &self.handler
    }

    pub fn type_name(&self) -> &'static str {
        self.handler.type_name()
    }

    /// True if this instance's handler is named `handler` and declares `action`.
    pub fn is_action(&self, handler: &str, action: &str) -> bool {
        self.handler.name() == handler && self.handler.has_action(action)
    }

    pub fn downcast_ref<H: Handler>(&self) -> Option<&H> {
        self.value.downcast_ref::<H>()
    }

    pub fn downcast_mut<H: Handler>(&mut self) -> Option<&mut H> {
        self.value.downcast_mut::<H>()
    }

    pub fn into_inner<H: Handler>(self) -> Result<H, Self> {
        let Instance { value, handler } = self;
        match value.downcast::<H>() {
            Ok(h) => Ok(*h),
            Err(value) => Err(Instance { value, handler }),
        }
    }

    pub(crate) fn value_mut(&mut self) -> &mut AnyHandler {
        &mut *self.value
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}
