//! Runtime descriptions of concrete Rust types.
//!
//! # Design
//! A `TypeDescriptor` pairs a `TypeId` with the canonical type name reported
//! by `std::any::type_name`. The name is structural: two descriptors built
//! independently for `Vec<Page<Entity>>` render the same string, so codecs
//! that only see text can still compare types.
//!
//! `TypeToken<T>` captures a fully parameterized type at a call site. The
//! type argument is mandatory; leaving it out does not compile:
//!
//! ```compile_fail
//! use restcall_core::TypeToken;
//!
//! let token = TypeToken::new();
//! println!("{token}");
//! ```
//!
//! ```
//! use restcall_core::TypeToken;
//!
//! let token = TypeToken::<Vec<Option<u32>>>::new();
//! assert!(token.type_name().ends_with("Vec<core::option::Option<u32>>"));
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Identity and canonical name of a concrete type.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: 'static>() -> Self {
        TypeDescriptor {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name including every nested type argument.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Zero-sized capture of the type `T`, consumed by `ObjectType::reified`.
pub struct TypeToken<T: 'static> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeToken<T> {
    pub fn new() -> Self {
        TypeToken {
            _marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl<T: 'static> Default for TypeToken<T> {
    fn default() -> Self {
        TypeToken::new()
    }
}

// Manual impls: derives would demand `T: Clone` and friends.
impl<T: 'static> Clone for TypeToken<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for TypeToken<T> {}

impl<T: 'static> PartialEq for TypeToken<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: 'static> Eq for TypeToken<T> {}

impl<T: 'static> fmt::Debug for TypeToken<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeToken").field(&self.type_name()).finish()
    }
}

impl<T: 'static> fmt::Display for TypeToken<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
