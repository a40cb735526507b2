use crate::FlagSet;

/// Outcome of a successful resolution run.
///
/// Besides the final [`FlagSet`], a resolution remembers which flags the
/// caller supplied and, for every other active flag, the rule that activated
/// it first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    flags: FlagSet,
    explicit: Vec<bool>,
    derived_by: Vec<Option<usize>>,
    passes: usize,
}

impl Resolution {
    pub(crate) fn new(
        flags: FlagSet,
        explicit: Vec<bool>,
        derived_by: Vec<Option<usize>>,
        passes: usize,
    ) -> Self {
        Self {
            flags,
            explicit,
            derived_by,
            passes,
        }
    }

    /// Returns the resolved flag set.
    #[must_use]
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Consumes the resolution, keeping only the flag set.
    #[must_use]
    pub fn into_flags(self) -> FlagSet {
        self.flags
    }

    /// Number of passes over the rule table, including the final pass in
    /// which no rule fired.
    ///
    /// The count depends on rule order; the flag set does not.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Returns `true` when the caller enabled `name` explicitly.
    #[must_use]
    pub fn is_explicit(&self, name: &str) -> bool {
        self.flags
            .vocabulary()
            .lookup(name)
            .is_some_and(|id| self.explicit[id.index()])
    }

    /// Returns the position of the rule that activated `name`.
    ///
    /// `None` for inactive, unknown and explicitly enabled flags.
    #[must_use]
    pub fn derived_by(&self, name: &str) -> Option<usize> {
        self.flags
            .vocabulary()
            .lookup(name)
            .and_then(|id| self.derived_by[id.index()])
    }

    /// Iterates over the explicitly enabled flags in declaration order.
    pub fn explicit(&self) -> impl Iterator<Item = &str> + '_ {
        self.flags
            .vocabulary()
            .names()
            .zip(self.explicit.iter().copied())
            .filter_map(|(name, explicit)| explicit.then_some(name))
    }

    /// Iterates over the derived flags and the rules that activated them.
    pub fn derived(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.flags
            .vocabulary()
            .names()
            .zip(self.derived_by.iter().copied())
            .filter_map(|(name, rule)| rule.map(|rule| (name, rule)))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        use std::collections::BTreeMap;

        let explicit: Vec<&str> = self.explicit().collect();
        let derived: BTreeMap<&str, usize> = self.derived().collect();

        let mut state = serializer.serialize_struct("Resolution", 4)?;
        state.serialize_field("flags", &self.flags)?;
        state.serialize_field("explicit", &explicit)?;
        state.serialize_field("derived_by", &derived)?;
        state.serialize_field("passes", &self.passes)?;
        state.end()
    }
}
