use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Type

/// A Rust type used as a type key.
///
/// Only the [`TypeId`] takes part in comparison and hashing; the path and
/// short name are kept for diagnostics and default discriminants.
///
/// Types are usually plain marker structs:
///
/// ```
/// use tg_graph::Type;
///
/// struct Circle;
///
/// let ty = Type::of::<Circle>();
/// assert_eq!(ty.name(), "Circle");
/// assert!(ty.is::<Circle>());
/// assert_ne!(ty, Type::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Type {
    /// Creates the [`Type`] of `T`.
    #[inline]
    pub fn of<T: ?Sized + Any>() -> Self {
        let path = core::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: short_name(path),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, e.g. `alloc::string::String`.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the type name without module path or generic parameters.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

// `alloc::vec::Vec<foo::Bar>` -> `Vec`
fn short_name(path: &'static str) -> &'static str {
    let base = match path.find('<') {
        Some(end) => &path[..end],
        None => path,
    };
    match base.rfind("::") {
        Some(start) => &base[start + 2..],
        None => base,
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
