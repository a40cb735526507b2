use thiserror::Error;

/// Configuration error detected while building a vocabulary or rule table.
///
/// Rule positions are zero-based indices into the sequence passed to
/// [`RuleTable::new`](crate::RuleTable::new).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    /// The same name was declared twice.
    #[error("flag '{name}' is declared more than once")]
    DuplicateFlag {
        /// The repeated name.
        name: String,
    },
    /// A rule mentions a name outside the vocabulary.
    #[error("rule #{rule} references unknown flag '{name}'")]
    UnknownFlag {
        /// Position of the offending rule.
        rule: usize,
        /// The unknown name.
        name: String,
    },
    /// A rule reads its own consequent.
    #[error("rule #{rule} reads its own consequent '{flag}'")]
    SelfReference {
        /// Position of the offending rule.
        rule: usize,
        /// The consequent flag.
        flag: String,
    },
    /// A rule negates a flag that another rule can activate.
    #[error("rule #{rule} negates '{flag}', which is derived by rule #{deriving_rule}")]
    NegatedDerivedFlag {
        /// Position of the rule containing the negation.
        rule: usize,
        /// The negated flag.
        flag: String,
        /// Position of a rule that derives the flag.
        deriving_rule: usize,
    },
}

impl TableError {
    /// Returns the position of the rule that caused the error.
    #[must_use]
    pub const fn rule(&self) -> Option<usize> {
        match self {
            Self::DuplicateFlag { .. } => None,
            Self::UnknownFlag { rule, .. }
            | Self::SelfReference { rule, .. }
            | Self::NegatedDerivedFlag { rule, .. } => Some(*rule),
        }
    }

    /// Returns the flag name the error is about.
    #[must_use]
    pub fn flag(&self) -> &str {
        match self {
            Self::DuplicateFlag { name } | Self::UnknownFlag { name, .. } => name,
            Self::SelfReference { flag, .. } | Self::NegatedDerivedFlag { flag, .. } => flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TableError;

    #[test]
    fn display_names_rule_and_flag() {
        let error = TableError::UnknownFlag {
            rule: 3,
            name: "ECP_LITE".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "rule #3 references unknown flag 'ECP_LITE'"
        );
        assert_eq!(error.rule(), Some(3));
        assert_eq!(error.flag(), "ECP_LITE");
    }

    #[test]
    fn duplicate_flag_has_no_rule() {
        let error = TableError::DuplicateFlag {
            name: "MD_C".to_owned(),
        };
        assert_eq!(error.rule(), None);
        assert_eq!(error.flag(), "MD_C");
        assert!(error.to_string().contains("more than once"));
    }

    #[test]
    fn negated_derived_flag_mentions_both_rules() {
        let error = TableError::NegatedDerivedFlag {
            rule: 4,
            flag: "X".to_owned(),
            deriving_rule: 1,
        };
        assert_eq!(
            error.to_string(),
            "rule #4 negates 'X', which is derived by rule #1"
        );
    }
}
