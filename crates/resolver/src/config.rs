use std::num::NonZeroUsize;

/// Tuning knobs for a [`Resolver`](crate::Resolver).
///
/// The default configuration is right for every valid rule table; the pass
/// limit exists so callers embedding the resolver can fail earlier.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ResolverConfig {
    pass_limit: Option<NonZeroUsize>,
}

impl ResolverConfig {
    /// Returns the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self { pass_limit: None }
    }

    /// Caps the number of passes, including the final pass that confirms no
    /// rule fires any more.
    #[must_use]
    pub const fn with_pass_limit(mut self, limit: NonZeroUsize) -> Self {
        self.pass_limit = Some(limit);
        self
    }

    /// Returns the explicitly configured pass limit, if any.
    #[must_use]
    pub const fn pass_limit(&self) -> Option<NonZeroUsize> {
        self.pass_limit
    }

    /// Returns the pass limit applied to a vocabulary of `flags` names.
    ///
    /// Without an explicit limit every productive pass activates at least one
    /// of the `flags`, so `flags + 1` passes always suffice.
    #[must_use]
    pub fn effective_pass_limit(&self, flags: usize) -> usize {
        self.pass_limit
            .map_or_else(|| flags.saturating_add(1), NonZeroUsize::get)
    }
}
