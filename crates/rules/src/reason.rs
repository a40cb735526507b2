use std::fmt;

/// Why a rule auto-enables its consequent instead of requiring the user to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RuleReason {
    /// No particular justification recorded.
    #[default]
    Implied,
    /// The cause is a superset of the consequent, so enabling the cause
    /// always provides the consequent as well.
    Superset,
    /// The cause did not depend on the consequent in an earlier release and
    /// existing configurations must keep building.
    BackwardCompat,
    /// The consequent is an internal option that is not part of the public
    /// configuration surface.
    Internal,
    /// The consequent names a capability that can be provided by more than
    /// one implementation.
    Capability,
    /// A dependency expected to disappear once the consequent's users are
    /// reworked.
    Temporary,
}

impl RuleReason {
    /// Returns the short token used when listing rules.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Implied => "implied",
            Self::Superset => "superset",
            Self::BackwardCompat => "backward-compat",
            Self::Internal => "internal",
            Self::Capability => "capability",
            Self::Temporary => "temporary",
        }
    }
}

impl fmt::Display for RuleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
