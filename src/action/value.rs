//! Boxed argument and return values with runtime type descriptors.
//!
//! # Responsibilities
//! - Describe a type by id, fully qualified name and representation kind
//! - Carry a type-erased value alongside its descriptor
//! - Convert between distinct types that share a scalar kind
//!
//! # Design Decisions
//! - Types opt in through [`Reflect`]; there is no general runtime reflection
//! - Capability (trait object) parameters adopt concrete values through an
//!   explicit list of implementors, see [`reflect_capability!`](crate::reflect_capability!)

use std::any::{type_name, Any, TypeId};
use std::fmt;

/// Underlying representation of a type, independent of its declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Int,
    Uint,
    Float,
    Bool,
    Struct,
    /// A trait object accepting any of its declared implementors.
    Capability,
    /// `()` and tuples; only meaningful as return shapes.
    Tuple,
}

impl Kind {
    /// Scalar kinds convert between differently named types.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Kind::String | Kind::Int | Kind::Uint | Kind::Float | Kind::Bool
        )
    }
}

/// A scalar value stripped of its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Repr {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

/// Identity, qualified name and kind of a [`Reflect`] type.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    kind: Kind,
}

impl TypeDescriptor {
    pub fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind: T::KIND,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name, e.g. `alloc::string::String`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name without its module path, e.g. `String`.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strips generic arguments and the module path from a type name.
pub fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

/// Types that can cross the dynamic call boundary as arguments or returns.
pub trait Reflect: Any + Send + Sized {
    const KIND: Kind;

    /// Scalar representation, for kinds where [`Kind::is_scalar`] holds.
    fn repr(&self) -> Option<Repr> {
        None
    }

    /// Rebuild from a scalar of the same kind. `None` if out of range.
    fn from_repr(_repr: Repr) -> Option<Self> {
        None
    }

    /// Accept a value of another type that satisfies this capability.
    fn adopt(value: Value) -> Result<Self, Value> {
        Err(value)
    }

    /// Types this value contributes to a return list.
    fn return_types() -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::of::<Self>()]
    }

    fn into_returns(self) -> Vec<Value> {
        vec![Value::new(self)]
    }
}

type ReprFn = fn(&(dyn Any + Send + 'static)) -> Option<Repr>;

fn repr_of<T: Reflect>(any: &(dyn Any + Send + 'static)) -> Option<Repr> {
    any.downcast_ref::<T>().and_then(T::repr)
}

/// A boxed value tagged with its type descriptor.
pub struct Value {
    inner: Box<dyn Any + Send>,
    ty: TypeDescriptor,
    repr: ReprFn,
}

impl Value {
    pub fn new<T: Reflect>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            ty: TypeDescriptor::of::<T>(),
            repr: repr_of::<T>,
        }
    }

    pub fn ty(&self) -> TypeDescriptor {
        self.ty
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.name
    }

    pub fn kind(&self) -> Kind {
        self.ty.kind
    }

    pub fn is<T: Any>(&self) -> bool {
        self.ty.id == TypeId::of::<T>()
    }

    pub fn repr(&self) -> Option<Repr> {
        (self.repr)(&*self.inner)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Unbox as `T`, handing the value back on a type mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Value { inner, ty, repr } = self;
        match inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Value { inner, ty, repr }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.ty.name)
            .field("repr", &self.repr())
            .finish()
    }
}

/// Builds a `Vec<Value>` from a list of [`Reflect`] expressions.
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::new($value)),*]
    };
}

/// Implements [`Reflect`] for tuple structs wrapping a scalar, so they convert
/// to and from any other type of the same kind.
#[macro_export]
macro_rules! reflect_newtype {
    ($($ty:ident($inner:ty)),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                const KIND: $crate::Kind = <$inner as $crate::Reflect>::KIND;

                fn repr(&self) -> ::std::option::Option<$crate::Repr> {
                    $crate::Reflect::repr(&self.0)
                }

                fn from_repr(repr: $crate::Repr) -> ::std::option::Option<Self> {
                    <$inner as $crate::Reflect>::from_repr(repr).map($ty)
                }
            }
        )+
    };
}

/// Implements [`Reflect`] for struct types passed by value, with no
/// conversions.
#[macro_export]
macro_rules! reflect_struct {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                const KIND: $crate::Kind = $crate::Kind::Struct;
            }
        )+
    };
}

/// Declares `Box<dyn Trait + Send>` as a capability parameter type that
/// accepts any of the listed implementors.
#[macro_export]
macro_rules! reflect_capability {
    ($cap:path => $($implementor:ty),+ $(,)?) => {
        impl $crate::Reflect for ::std::boxed::Box<dyn $cap + Send> {
            const KIND: $crate::Kind = $crate::Kind::Capability;

            fn adopt(value: $crate::Value) -> ::std::result::Result<Self, $crate::Value> {
                $(
                    let value = match value.downcast::<$implementor>() {
                        Ok(concrete) => return Ok(::std::boxed::Box::new(concrete)),
                        Err(value) => value,
                    };
                )+
                Err(value)
            }
        }
    };
}

macro_rules! reflect_signed {
    ($($t:ty),+) => {
        $(
            impl Reflect for $t {
                const KIND: Kind = Kind::Int;

                fn repr(&self) -> Option<Repr> {
                    i64::try_from(*self).ok().map(Repr::Int)
                }

                fn from_repr(repr: Repr) -> Option<Self> {
                    match repr {
                        Repr::Int(v) => <$t>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

macro_rules! reflect_unsigned {
    ($($t:ty),+) => {
        $(
            impl Reflect for $t {
                const KIND: Kind = Kind::Uint;

                fn repr(&self) -> Option<Repr> {
                    u64::try_from(*self).ok().map(Repr::Uint)
                }

                fn from_repr(repr: Repr) -> Option<Self> {
                    match repr {
                        Repr::Uint(v) => <$t>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

reflect_signed!(i8, i16, i32, i64, isize);
reflect_unsigned!(u8, u16, u32, u64, usize);

impl Reflect for f64 {
    const KIND: Kind = Kind::Float;

    fn repr(&self) -> Option<Repr> {
        Some(Repr::Float(*self))
    }

    fn from_repr(repr: Repr) -> Option<Self> {
        match repr {
            Repr::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl Reflect for f32 {
    const KIND: Kind = Kind::Float;

    fn repr(&self) -> Option<Repr> {
        Some(Repr::Float(f64::from(*self)))
    }

    fn from_repr(repr: Repr) -> Option<Self> {
        match repr {
            Repr::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl Reflect for bool {
    const KIND: Kind = Kind::Bool;

    fn repr(&self) -> Option<Repr> {
        Some(Repr::Bool(*self))
    }

    fn from_repr(repr: Repr) -> Option<Self> {
        match repr {
            Repr::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl Reflect for String {
    const KIND: Kind = Kind::String;

    fn repr(&self) -> Option<Repr> {
        Some(Repr::String(self.clone()))
    }

    fn from_repr(repr: Repr) -> Option<Self> {
        match repr {
            Repr::String(v) => Some(v),
            _ => None,
        }
    }
}

impl Reflect for () {
    const KIND: Kind = Kind::Tuple;

    fn return_types() -> Vec<TypeDescriptor> {
        Vec::new()
    }

    fn into_returns(self) -> Vec<Value> {
        Vec::new()
    }
}

macro_rules! reflect_tuple {
    ($($T:ident),+) => {
        impl<$($T: Reflect),+> Reflect for ($($T,)+) {
            const KIND: Kind = Kind::Tuple;

            fn return_types() -> Vec<TypeDescriptor> {
                vec![$(TypeDescriptor::of::<$T>()),+]
            }

            #[allow(non_snake_case)]
            fn into_returns(self) -> Vec<Value> {
                let ($($T,)+) = self;
                vec![$(Value::new($T)),+]
            }
        }
    };
}

reflect_tuple!(A, B);
reflect_tuple!(A, B, C);
reflect_tuple!(A, B, C, D);
