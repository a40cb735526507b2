use thiserror::Error;

/// Error returned by [`Resolver::resolve`](crate::Resolver::resolve).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ResolveError {
    /// The base set names a flag outside the table's vocabulary.
    #[error("unknown flag '{name}' in base set")]
    UnknownFlag {
        /// The unrecognised name.
        name: String,
    },
    /// Resolution was still activating flags when the pass limit ran out.
    ///
    /// With the default limit this means the rule table broke an invariant;
    /// no partial result is returned.
    #[error("flag resolution did not converge after {passes} passes (limit {limit})")]
    NonConvergence {
        /// Passes completed before giving up.
        passes: usize,
        /// The limit in force.
        limit: usize,
    },
}

impl ResolveError {
    /// Returns the unknown flag name, if that is what went wrong.
    #[must_use]
    pub fn unknown_flag(&self) -> Option<&str> {
        match self {
            Self::UnknownFlag { name } => Some(name),
            Self::NonConvergence { .. } => None,
        }
    }

    /// Returns `true` for errors caused by the caller's input rather than by
    /// the resolver or its rule table.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::UnknownFlag { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::ResolveError;

    #[test]
    fn unknown_flag_is_a_caller_error() {
        let error = ResolveError::UnknownFlag {
            name: "MBEDTLS_NOPE".to_owned(),
        };
        assert!(error.is_caller_error());
        assert_eq!(error.unknown_flag(), Some("MBEDTLS_NOPE"));
        assert_eq!(error.to_string(), "unknown flag 'MBEDTLS_NOPE' in base set");
    }

    #[test]
    fn non_convergence_reports_limit() {
        let error = ResolveError::NonConvergence {
            passes: 4,
            limit: 4,
        };
        assert!(!error.is_caller_error());
        assert_eq!(error.unknown_flag(), None);
        assert!(error.to_string().contains("limit 4"));
    }
}
