use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use tg_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// CustomData

/// User data attached to a type or a property.
///
/// Entries are stored by their [`TypeId`], so there can only be one entry
/// per type. Later insertions overwrite earlier ones.
///
/// # Example
///
/// ```
/// use tg_codec::metadata::CustomData;
///
/// struct Label(&'static str);
///
/// let mut data = CustomData::new();
/// data.insert(Label("identifier"));
/// data.insert(3_u8);
///
/// assert_eq!(data.get::<Label>().unwrap().0, "identifier");
/// assert_eq!(data.get::<u8>(), Some(&3));
/// assert!(!data.contains::<u16>());
/// ```
#[derive(Clone, Default)]
pub struct CustomData {
    entries: TypeIdMap<Arc<dyn Any + Send + Sync>>,
}

impl CustomData {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, replacing the previous value of the same type.
    #[inline]
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains(&TypeId::of::<T>())
    }

    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CustomData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomData").field("len", &self.len()).finish()
    }
}
