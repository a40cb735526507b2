use std::fmt;

use crate::{Predicate, RuleReason};

/// Implication from a [`Predicate`] to a single consequent flag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    pub(crate) consequent: String,
    pub(crate) predicate: Predicate,
    pub(crate) reason: RuleReason,
    pub(crate) note: Option<String>,
}

impl Rule {
    /// Creates a rule that activates `consequent` whenever `predicate` holds.
    ///
    /// A bare flag name converts into a single-cause predicate.
    ///
    /// # Examples
    /// ```
    /// use rules::{Predicate, Rule};
    ///
    /// let single = Rule::new("MD_LIGHT", "MD_C");
    /// assert_eq!(single.to_string(), "MD_C => MD_LIGHT");
    ///
    /// let either = Rule::new("MD_LIGHT", Predicate::any(["PK_C", "RSA_C"]));
    /// assert_eq!(either.to_string(), "(PK_C || RSA_C) => MD_LIGHT");
    /// ```
    #[must_use]
    pub fn new(consequent: impl Into<String>, predicate: impl Into<Predicate>) -> Self {
        Self {
            consequent: consequent.into(),
            predicate: predicate.into(),
            reason: RuleReason::Implied,
            note: None,
        }
    }

    /// Records why the consequent is auto-enabled.
    #[must_use]
    pub fn with_reason(mut self, reason: RuleReason) -> Self {
        self.reason = reason;
        self
    }

    /// Attaches a free-text explanation.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns the flag the rule activates.
    #[must_use]
    pub fn consequent(&self) -> &str {
        &self.consequent
    }

    /// Returns the condition under which the rule fires.
    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Returns the recorded justification.
    #[must_use]
    pub const fn reason(&self) -> RuleReason {
        self.reason
    }

    /// Returns the free-text explanation, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns `true` when the predicate reads the consequent.
    #[must_use]
    pub fn is_self_referential(&self) -> bool {
        self.predicate.references(&self.consequent)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.predicate, self.consequent)
    }
}
