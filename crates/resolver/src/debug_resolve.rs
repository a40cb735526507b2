//! Structured tracing for resolution runs.
//!
//! All functions are compiled behind the `tracing` feature flag and become
//! no-op inline functions when it is disabled.

/// Target name for tracing events emitted while resolving.
#[cfg(feature = "tracing")]
const RESOLVE_TARGET: &str = "flags::resolve";

/// Traces the start of a resolution run.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_resolve_start(explicit: usize, rules: usize, pass_limit: usize) {
    tracing::debug!(
        target: RESOLVE_TARGET,
        explicit = explicit,
        rules = rules,
        pass_limit = pass_limit,
        "resolve_start"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_resolve_start(_explicit: usize, _rules: usize, _pass_limit: usize) {}

/// Traces a rule activating its consequent.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_rule_fired(pass: usize, rule: usize, consequent: &str) {
    tracing::trace!(
        target: RESOLVE_TARGET,
        pass = pass,
        rule = rule,
        consequent = %consequent,
        "rule_fired"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_rule_fired(_pass: usize, _rule: usize, _consequent: &str) {}

/// Traces the end of one pass over the rule table.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_pass_complete(pass: usize, activated: usize) {
    tracing::trace!(
        target: RESOLVE_TARGET,
        pass = pass,
        activated = activated,
        "pass_complete"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_pass_complete(_pass: usize, _activated: usize) {}

/// Traces a finished resolution.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_resolve_complete(passes: usize, active: usize, derived: usize) {
    tracing::debug!(
        target: RESOLVE_TARGET,
        passes = passes,
        active = active,
        derived = derived,
        "resolve_complete"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_resolve_complete(_passes: usize, _active: usize, _derived: usize) {}

/// Traces a run abandoned at the pass limit.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_non_convergence(passes: usize, limit: usize) {
    tracing::error!(
        target: RESOLVE_TARGET,
        passes = passes,
        limit = limit,
        "resolve_non_convergence"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_non_convergence(_passes: usize, _limit: usize) {}
