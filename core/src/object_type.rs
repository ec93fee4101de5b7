//! Expected result shapes for response deserialization.
//!
//! # Design
//! `ObjectType` is a closed enum. Each variant wraps a struct with private
//! fields, so the three factories on `ObjectType` are the only way to build
//! one. Whatever the variant, `target()` names the concrete type the response
//! body must become; executors call `check_target` to make sure that witness
//! agrees with the type the caller asked for statically.
//!
//! `Parameterized` covers one level of generics over business types. It is
//! not meant for collection results: use `Reified` for those, or the
//! executor's collection operation with an element type.

use std::fmt;

use crate::error::RestError;
use crate::type_token::{TypeDescriptor, TypeToken};

/// A generic type with its single parameter left open.
///
/// ```
/// use restcall_core::{GenericType, ObjectType};
///
/// struct Envelope<T> {
///     data: T,
/// }
///
/// struct EnvelopeOf;
///
/// impl GenericType for EnvelopeOf {
///     type Applied<P: 'static> = Envelope<P>;
/// }
///
/// let object_type = ObjectType::parameterized::<EnvelopeOf, String>();
/// assert!(object_type.target().is::<Envelope<String>>());
/// ```
pub trait GenericType: 'static {
    type Applied<P: 'static>: 'static;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Single(SingleObjectType),
    Parameterized(ParameterizedObjectType),
    Reified(ReifiedObjectType),
}

/// Exactly one instance of a plain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SingleObjectType {
    object_type: TypeDescriptor,
}

impl SingleObjectType {
    pub fn object_type(&self) -> TypeDescriptor {
        self.object_type
    }
}

/// One instance of `G::Applied<P>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterizedObjectType {
    generic_type: TypeDescriptor,
    parameter_type: TypeDescriptor,
    applied_type: TypeDescriptor,
}

impl ParameterizedObjectType {
    /// The family marker, e.g. `EnvelopeOf`.
    pub fn generic_type(&self) -> TypeDescriptor {
        self.generic_type
    }

    pub fn parameter_type(&self) -> TypeDescriptor {
        self.parameter_type
    }

    /// The concrete generic type, e.g. `Envelope<User>`.
    pub fn applied_type(&self) -> TypeDescriptor {
        self.applied_type
    }
}

/// Arbitrarily nested type captured by a `TypeToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReifiedObjectType {
    type_token: TypeDescriptor,
}

impl ReifiedObjectType {
    pub fn type_token(&self) -> TypeDescriptor {
        self.type_token
    }
}

impl ObjectType {
    pub fn single<T: 'static>() -> Self {
        ObjectType::Single(SingleObjectType {
            object_type: TypeDescriptor::of::<T>(),
        })
    }

    pub fn parameterized<G: GenericType, P: 'static>() -> Self {
        ObjectType::Parameterized(ParameterizedObjectType {
            generic_type: TypeDescriptor::of::<G>(),
            parameter_type: TypeDescriptor::of::<P>(),
            applied_type: TypeDescriptor::of::<G::Applied<P>>(),
        })
    }

    pub fn reified<T: 'static>(token: TypeToken<T>) -> Self {
        ObjectType::Reified(ReifiedObjectType {
            type_token: token.descriptor(),
        })
    }

    /// Concrete type a deserializer has to produce for this shape.
    pub fn target(&self) -> TypeDescriptor {
        match self {
            ObjectType::Single(single) => single.object_type,
            ObjectType::Parameterized(parameterized) => parameterized.applied_type,
            ObjectType::Reified(reified) => reified.type_token,
        }
    }

    pub fn check_target<T: 'static>(&self) -> Result<(), RestError> {
        if self.target().is::<T>() {
            Ok(())
        } else {
            Err(RestError::usage(format!(
                "object type `{}` does not describe the requested result type `{}`",
                self.target(),
                std::any::type_name::<T>()
            )))
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.target(), f)
    }
}
