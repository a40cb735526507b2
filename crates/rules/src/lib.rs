#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `rules` describes how build-time feature flags imply one another. A
//! [`RuleTable`] pairs a finite [`Vocabulary`] of flag names with an ordered
//! list of [`Rule`]s, each stating that a consequent flag must be active
//! whenever its [`Predicate`] holds. The `resolver` crate consumes these tables
//! to compute the closure of a user-supplied flag set.
//!
//! # Design
//!
//! - [`Predicate`] is a plain expression tree (`Flag`, `All`, `Any`, `Not`)
//!   written against flag names. It is cheap to build and easy to print.
//! - [`RuleTable::new`] validates every rule and compiles its predicate into a
//!   [`CompiledPredicate`] over dense [`FlagId`]s, so evaluation never hashes
//!   a string.
//! - Compiled predicates read flag state through the [`FlagState`] trait,
//!   which lets the resolver evaluate rules directly against its working set.
//! - [`catalogue`] ships the legacy crypto adjustment table.
//!
//! # Invariants
//!
//! - A table never changes after construction and is safe to share between
//!   threads.
//! - No rule reads its own consequent.
//! - Negation only applies to flags that no rule derives. Together with the
//!   previous invariant this makes every table monotone in the flags rules can
//!   activate, so the closure does not depend on rule order.
//!
//! # Errors
//!
//! [`Vocabulary::new`] and [`RuleTable::new`] report [`TableError`] for
//! duplicate names, unknown flags, self-referential rules and negated derived
//! flags. Errors carry the offending rule position and flag name.
//!
//! # Examples
//!
//! ```
//! use rules::{Predicate, Rule, RuleReason, RuleTable, Vocabulary};
//!
//! let vocabulary = Vocabulary::new(["MD_C", "MD_LIGHT", "RSA_C"]).unwrap();
//! let table = RuleTable::new(
//!     vocabulary,
//!     [
//!         Rule::new("MD_LIGHT", "MD_C").with_reason(RuleReason::Superset),
//!         Rule::new("MD_LIGHT", Predicate::any(["RSA_C"]))
//!             .with_reason(RuleReason::BackwardCompat),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(table.rules_deriving("MD_LIGHT").count(), 2);
//! ```

pub mod catalogue;
mod debug_table;
mod error;
mod predicate;
mod reason;
mod rule;
mod table;
mod vocabulary;

pub use error::TableError;
pub use predicate::{CompiledPredicate, FlagState, Predicate};
pub use reason::RuleReason;
pub use rule::Rule;
pub use table::{CompiledRule, RuleTable};
pub use vocabulary::{FlagId, Vocabulary};
