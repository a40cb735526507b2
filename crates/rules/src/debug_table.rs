//! Structured tracing for rule table construction.
//!
//! All functions are compiled behind the `tracing` feature flag and become
//! no-op inline functions when it is disabled.

/// Target name for tracing events emitted while building tables.
#[cfg(feature = "tracing")]
const TABLE_TARGET: &str = "flags::table";

/// Traces a rule that compiled successfully.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_rule_compiled(index: usize, consequent: &str, references: usize) {
    tracing::trace!(
        target: TABLE_TARGET,
        index = index,
        consequent = %consequent,
        references = references,
        "rule_compiled"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_rule_compiled(_index: usize, _consequent: &str, _references: usize) {}

/// Traces a rule rejected during validation.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_rule_rejected(error: &crate::TableError) {
    tracing::warn!(
        target: TABLE_TARGET,
        rule = ?error.rule(),
        flag = %error.flag(),
        error = %error,
        "rule_rejected"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_rule_rejected(_error: &crate::TableError) {}

/// Traces the summary of a finished table.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_table_built(flags: usize, rules: usize, derived: usize) {
    tracing::debug!(
        target: TABLE_TARGET,
        flags = flags,
        rules = rules,
        derived = derived,
        "table_built"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_table_built(_flags: usize, _rules: usize, _derived: usize) {}
