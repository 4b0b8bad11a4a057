use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use tg_graph::Type;

// -----------------------------------------------------------------------------
// TypeArgument

/// A reference to a type, resolved through a [`TypeManager`].
///
/// - [`Type`]: a concrete type.
/// - [`Lazy`]: a function returning the type, for types that are not
///   nameable yet where the argument is written (self references).
/// - [`Alias`]: a name registered with
///   [`TypeConfigurator::alias`](crate::manager::TypeConfigurator::alias).
///
/// [`TypeManager`]: crate::TypeManager
/// [`Type`]: TypeArgument::Type
/// [`Lazy`]: TypeArgument::Lazy
/// [`Alias`]: TypeArgument::Alias
#[derive(Clone)]
pub enum TypeArgument {
    Type(Type),
    Lazy(fn() -> Option<Type>),
    Alias(Cow<'static, str>),
}

impl TypeArgument {
    /// The argument naming `T`.
    #[inline]
    pub fn of<T: ?Sized + Any>() -> Self {
        Self::Type(Type::of::<T>())
    }

    #[inline]
    pub const fn lazy(resolver: fn() -> Option<Type>) -> Self {
        Self::Lazy(resolver)
    }

    #[inline]
    pub fn alias(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Alias(name.into())
    }
}

impl fmt::Debug for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => f.debug_tuple("Type").field(ty).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
            Self::Alias(name) => f.debug_tuple("Alias").field(name).finish(),
        }
    }
}

impl From<Type> for TypeArgument {
    #[inline]
    fn from(value: Type) -> Self {
        Self::Type(value)
    }
}

impl From<&'static str> for TypeArgument {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::Alias(Cow::Borrowed(value))
    }
}

impl From<String> for TypeArgument {
    #[inline]
    fn from(value: String) -> Self {
        Self::Alias(Cow::Owned(value))
    }
}

// -----------------------------------------------------------------------------
// GenericArgument

/// A type argument together with the generic arguments it is applied to.
///
/// # Examples
///
/// ```
/// use tg_codec::GenericArgument;
/// use tg_codec::codec::{Array, Map};
///
/// // Map<String, Array<f64>>
/// let argument = GenericArgument::of::<Map>()
///     .with(GenericArgument::of::<String>())
///     .with(GenericArgument::of::<Array>().with(GenericArgument::of::<f64>()));
///
/// assert_eq!(argument.generics().len(), 2);
/// assert_eq!(argument.generics()[1].generics().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct GenericArgument {
    argument: TypeArgument,
    generics: Vec<GenericArgument>,
}

impl GenericArgument {
    #[inline]
    pub fn new(argument: impl Into<TypeArgument>) -> Self {
        Self {
            argument: argument.into(),
            generics: Vec::new(),
        }
    }

    #[inline]
    pub fn of<T: ?Sized + Any>() -> Self {
        Self::new(TypeArgument::of::<T>())
    }

    /// Appends a generic argument.
    #[inline]
    pub fn with(mut self, generic: impl Into<GenericArgument>) -> Self {
        self.generics.push(generic.into());
        self
    }

    #[inline]
    pub fn argument(&self) -> &TypeArgument {
        &self.argument
    }

    #[inline]
    pub fn generics(&self) -> &[GenericArgument] {
        &self.generics
    }

    /// Compiles the nested generic arguments into a [`GenericChain`].
    #[inline]
    pub fn chain(&self) -> GenericChain {
        GenericChain::compile(&self.generics)
    }
}

impl From<TypeArgument> for GenericArgument {
    #[inline]
    fn from(value: TypeArgument) -> Self {
        Self::new(value)
    }
}

impl From<Type> for GenericArgument {
    #[inline]
    fn from(value: Type) -> Self {
        Self::new(value)
    }
}

impl From<&'static str> for GenericArgument {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

// -----------------------------------------------------------------------------
// GenericChain

/// One slot of a [`GenericChain`].
#[derive(Clone, Debug)]
pub struct GenericNode {
    argument: TypeArgument,
    generics: GenericChain,
}

impl GenericNode {
    #[inline]
    pub fn argument(&self) -> &TypeArgument {
        &self.argument
    }

    /// Generic arguments of this slot's own type.
    #[inline]
    pub fn generics(&self) -> &GenericChain {
        &self.generics
    }
}

/// Compiled generic arguments, shared between every context that enters
/// them.
///
/// Nothing is resolved at compile time. A slot becomes a
/// [`TypeMetadata`](crate::metadata::TypeMetadata) only when a context enters
/// it, so unused and self referencing generics cost nothing.
#[derive(Clone, Debug, Default)]
pub struct GenericChain(Option<Arc<[GenericNode]>>);

impl GenericChain {
    /// The empty chain.
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    pub fn compile(arguments: &[GenericArgument]) -> Self {
        if arguments.is_empty() {
            return Self(None);
        }
        let nodes: Vec<GenericNode> = arguments
            .iter()
            .map(|argument| GenericNode {
                argument: argument.argument.clone(),
                generics: GenericChain::compile(&argument.generics),
            })
            .collect();
        Self(Some(Arc::from(nodes)))
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&GenericNode> {
        self.0.as_deref().and_then(|nodes| nodes.get(index))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.as_deref().map_or(0, <[GenericNode]>::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

#[cfg(test)]
mod tests {
    use tg_graph::Type;

    use super::{GenericArgument, GenericChain, TypeArgument};

    struct Tree;

    #[test]
    fn chain_keeps_nesting() {
        let argument = GenericArgument::of::<Tree>()
            .with(GenericArgument::new(TypeArgument::lazy(|| Some(Type::of::<Tree>()))).with(Type::of::<f64>()))
            .with("String");

        let chain = argument.chain();
        assert_eq!(chain.len(), 2);
        assert!(matches!(chain.get(0).unwrap().argument(), TypeArgument::Lazy(_)));
        assert_eq!(chain.get(0).unwrap().generics().len(), 1);
        assert!(matches!(chain.get(1).unwrap().argument(), TypeArgument::Alias(name) if name == "String"));
        assert!(chain.get(1).unwrap().generics().is_empty());
        assert!(chain.get(2).is_none());
    }

    #[test]
    fn empty_chain() {
        let chain = GenericChain::compile(&[]);
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.get(0).is_none());
    }
}
