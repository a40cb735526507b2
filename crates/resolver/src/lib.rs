#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `resolver` computes the closure of a set of build-time feature flags under
//! a [`RuleTable`](rules::RuleTable): starting from the flags the user enabled
//! explicitly, it activates every flag implied directly or transitively by the
//! table's rules and nothing else.
//!
//! # Design
//!
//! [`Resolver`] runs an iterative fixed-point loop. Each pass evaluates every
//! compiled rule against the working [`FlagSet`]; a rule whose predicate holds
//! activates its consequent if that flag is still inactive. The loop stops
//! after the first pass that activates nothing. Results are returned as a
//! [`Resolution`], which also records the explicit flags, the rule that
//! derived each other flag, and the number of passes.
//!
//! # Invariants
//!
//! - Activation is one-directional within a run, and rule tables only negate
//!   flags that no rule derives. The closure is therefore the least fixed
//!   point and does not depend on rule order; only the pass count does.
//! - Each productive pass activates at least one flag, so a run needs at most
//!   one pass per flag plus a final quiet pass. [`ResolverConfig`] can lower
//!   that bound.
//! - Rule cycles without an outside cause never activate: a flag only turns on
//!   when a predicate holds on flags that are already active.
//! - A run owns its working set; tables are shared read-only.
//!
//! # Errors
//!
//! [`ResolveError::UnknownFlag`] reports base-set names outside the table's
//! vocabulary. [`ResolveError::NonConvergence`] reports a run that exhausted
//! its pass limit; no partial result is returned.
//!
//! # Examples
//!
//! Resolve the concrete compressed-point scenario against the built-in table:
//!
//! ```
//! use resolver::Resolver;
//! use rules::catalogue::{self, symbols};
//!
//! let table = catalogue::legacy_crypto().unwrap();
//! let resolution = Resolver::new(table)
//!     .resolve_enabled([symbols::PK_PARSE_C, symbols::ECP_C])
//!     .unwrap();
//!
//! assert!(resolution.flags().contains(symbols::PK_PARSE_EC_COMPRESSED));
//! assert!(!resolution.flags().contains(symbols::MD_LIGHT));
//! ```
//!
//! # See also
//!
//! - [`rules`] for building tables and the legacy crypto catalogue.

mod config;
mod debug_resolve;
mod error;
mod flag_set;
mod resolution;
mod resolver;

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use flag_set::FlagSet;
pub use resolution::Resolution;
pub use resolver::Resolver;

#[cfg(test)]
mod tests;
