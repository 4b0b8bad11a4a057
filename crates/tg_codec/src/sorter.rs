//! Ordering of properties and inject slots.
//!
//! Without a sorter, properties keep declaration order (inherited ones
//! first) and inject slots keep index order.

use core::cmp::Ordering;

use crate::metadata::{InjectMetadata, PropertyMetadata};

// -----------------------------------------------------------------------------
// Traits

/// Orders the properties a type codec visits.
pub trait PropertySorter: Send + Sync {
    fn compare(&self, a: &PropertyMetadata, b: &PropertyMetadata) -> Ordering;
}

/// Orders the inject slots a factory fills.
pub trait InjectSorter: Send + Sync {
    fn compare(&self, a: &InjectMetadata, b: &InjectMetadata) -> Ordering;
}

// -----------------------------------------------------------------------------
// Implementations

/// Property names, ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct AscPropertySorter;

/// Property names, descending.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescPropertySorter;

/// Slot indices, ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct AscInjectSorter;

/// Slot indices, descending.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescInjectSorter;

impl PropertySorter for AscPropertySorter {
    #[inline]
    fn compare(&self, a: &PropertyMetadata, b: &PropertyMetadata) -> Ordering {
        a.name().cmp(b.name())
    }
}

impl PropertySorter for DescPropertySorter {
    #[inline]
    fn compare(&self, a: &PropertyMetadata, b: &PropertyMetadata) -> Ordering {
        b.name().cmp(a.name())
    }
}

impl InjectSorter for AscInjectSorter {
    #[inline]
    fn compare(&self, a: &InjectMetadata, b: &InjectMetadata) -> Ordering {
        a.index().cmp(&b.index())
    }
}

impl InjectSorter for DescInjectSorter {
    #[inline]
    fn compare(&self, a: &InjectMetadata, b: &InjectMetadata) -> Ordering {
        b.index().cmp(&a.index())
    }
}
