use alloc::string::String;

// -----------------------------------------------------------------------------
// InjectMetadata

/// A constructor slot of a type.
///
/// [`ObjectFactory`](crate::factory::ObjectFactory) fills the slots in
/// [`InjectSorter`](crate::sorter::InjectSorter) order: the collected entry
/// named by `key` (or by the slot name when no key is set) is written to the
/// field `name` of the built instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectMetadata {
    index: usize,
    name: Option<String>,
    key: Option<String>,
}

impl InjectMetadata {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            name: None,
            key: None,
        }
    }

    /// Position of the slot.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Field receiving the argument.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Entry supplying the argument.
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().or(self.name.as_deref())
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    #[inline]
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }
}
