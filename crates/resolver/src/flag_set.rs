use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rules::{FlagId, FlagState, Vocabulary};

/// Activation state of every flag in a vocabulary.
///
/// Flag sets returned by the resolver are read-only snapshots: the public API
/// offers no way to toggle a flag. Iteration follows vocabulary declaration
/// order.
#[derive(Clone)]
pub struct FlagSet {
    vocabulary: Arc<Vocabulary>,
    active: Vec<bool>,
}

impl FlagSet {
    /// Creates a set over `vocabulary` with every flag inactive.
    #[must_use]
    pub fn inactive(vocabulary: Arc<Vocabulary>) -> Self {
        let active = vec![false; vocabulary.len()];
        Self { vocabulary, active }
    }

    /// Returns the state of `name`, or `None` when the vocabulary does not
    /// know it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.vocabulary
            .lookup(name)
            .map(|id| self.active[id.index()])
    }

    /// Returns `true` when `name` is known and active.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    /// Iterates over every flag and its state.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, bool)> + '_ {
        self.vocabulary.names().zip(self.active.iter().copied())
    }

    /// Iterates over the names of the active flags.
    pub fn active(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter()
            .filter_map(|(name, active)| active.then_some(name))
    }

    /// Number of active flags.
    #[must_use]
    pub fn count_active(&self) -> usize {
        self.active.iter().filter(|active| **active).count()
    }

    /// Returns `true` when every flag active here is also active in `other`.
    ///
    /// Flags are matched by name, so sets over different vocabularies can be
    /// compared; a name missing from `other` counts as inactive there.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.active().all(|name| other.contains(name))
    }

    /// Copies the state into an owned map keyed by flag name.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        self.iter()
            .map(|(name, active)| (name.to_owned(), active))
            .collect()
    }

    /// Returns the vocabulary the set is defined over.
    #[must_use]
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    pub(crate) fn is_set(&self, id: FlagId) -> bool {
        self.active[id.index()]
    }

    /// Activates `id`, returning `true` when it was inactive before.
    pub(crate) fn activate(&mut self, id: FlagId) -> bool {
        !std::mem::replace(&mut self.active[id.index()], true)
    }

    pub(crate) fn set(&mut self, id: FlagId, value: bool) {
        self.active[id.index()] = value;
    }
}

impl FlagState for FlagSet {
    fn is_active(&self, flag: FlagId) -> bool {
        self.active.get(flag.index()).copied().unwrap_or(false)
    }
}

impl PartialEq for FlagSet {
    fn eq(&self, other: &Self) -> bool {
        self.active == other.active
            && (Arc::ptr_eq(&self.vocabulary, &other.vocabulary)
                || self.vocabulary == other.vocabulary)
    }
}

impl Eq for FlagSet {}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.active()).finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FlagSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.active.len()))?;
        for (name, active) in self.iter() {
            map.serialize_entry(name, &active)?;
        }
        map.end()
    }
}
