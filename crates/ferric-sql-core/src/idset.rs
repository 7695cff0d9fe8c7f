//! Small insertion-ordered sets used by the consistency checker.
//!
//! Required/provided tables and CTEs are tracked as sets: duplicates
//! collapse, union is commutative and associative with respect to
//! membership, and iteration follows first insertion so that error
//! reporting stays deterministic.

/// An insertion-ordered set backed by a `Vec`.
///
/// The element counts in play are tiny (a handful of tables per statement),
/// so linear membership tests beat hashing here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSet<T: PartialEq> {
    items: Vec<T>,
}

impl<T: PartialEq> IdSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Inserts an element, collapsing duplicates. Returns whether the
    /// element was newly added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Returns whether the element is a member.
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Adds every element of `other` to this set.
    pub fn union_with(&mut self, other: Self) {
        for item in other.items {
            self.insert(item);
        }
    }

    /// Removes every element that is a member of `other`.
    pub fn subtract(&mut self, other: &Self) {
        self.items.retain(|item| !other.contains(item));
    }

    /// Iterates the elements in first-insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the first element in insertion order, if any.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }
}

impl<T: PartialEq> Default for IdSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<T> for IdSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a, T: PartialEq> IntoIterator for &'a IdSet<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
