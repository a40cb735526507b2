use std::borrow::Borrow;
use std::sync::Arc;

use rules::RuleTable;

use crate::{
    FlagSet, ResolveError, Resolution, ResolverConfig,
    debug_resolve::{
        trace_non_convergence, trace_pass_complete, trace_resolve_complete, trace_resolve_start,
        trace_rule_fired,
    },
};

/// Computes the closure of a base flag set under a [`RuleTable`].
///
/// A resolver borrows its table and holds no other state, so any number of
/// resolvers may share one table across threads.
///
/// # Examples
///
/// ```
/// use resolver::Resolver;
/// use rules::{Rule, RuleTable, Vocabulary};
///
/// let vocabulary = Vocabulary::new(["A", "B", "C"]).unwrap();
/// let table = RuleTable::new(vocabulary, [Rule::new("B", "A"), Rule::new("C", "B")]).unwrap();
///
/// let resolution = Resolver::new(&table).resolve([("A", true)]).unwrap();
/// assert_eq!(resolution.flags().active().collect::<Vec<_>>(), ["A", "B", "C"]);
/// assert_eq!(resolution.derived_by("C"), Some(1));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'t> {
    table: &'t RuleTable,
    config: ResolverConfig,
}

impl<'t> Resolver<'t> {
    /// Creates a resolver with the default configuration.
    #[must_use]
    pub const fn new(table: &'t RuleTable) -> Self {
        Self::with_config(table, ResolverConfig::new())
    }

    /// Creates a resolver with an explicit configuration.
    #[must_use]
    pub const fn with_config(table: &'t RuleTable, config: ResolverConfig) -> Self {
        Self { table, config }
    }

    /// Returns the table the resolver evaluates.
    #[must_use]
    pub const fn table(&self) -> &'t RuleTable {
        self.table
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Resolves a base set given as `(name, enabled)` pairs.
    ///
    /// Flags not mentioned start inactive. When a name appears more than
    /// once the last entry wins.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UnknownFlag`] when a name is outside the vocabulary,
    /// [`ResolveError::NonConvergence`] when the pass limit runs out.
    pub fn resolve<I, S, B>(&self, base: I) -> Result<Resolution, ResolveError>
    where
        I: IntoIterator<Item = (S, B)>,
        S: AsRef<str>,
        B: Borrow<bool>,
    {
        let vocabulary = self.table.vocabulary();
        let mut flags = FlagSet::inactive(Arc::clone(vocabulary));

        for (name, enabled) in base {
            let name = name.as_ref();
            let id = vocabulary
                .lookup(name)
                .ok_or_else(|| ResolveError::UnknownFlag {
                    name: name.to_owned(),
                })?;
            flags.set(id, *enabled.borrow());
        }

        self.close(flags)
    }

    /// Resolves a base set in which every listed name is enabled.
    ///
    /// # Errors
    ///
    /// As for [`resolve`](Self::resolve).
    pub fn resolve_enabled<I, S>(&self, names: I) -> Result<Resolution, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolve(names.into_iter().map(|name| (name, true)))
    }

    /// Resolves an existing flag set, treating every active flag as explicit.
    ///
    /// Flags are matched by name, so `base` may come from a table with a
    /// different vocabulary as long as its active flags are known here.
    ///
    /// # Errors
    ///
    /// As for [`resolve`](Self::resolve).
    pub fn resolve_set(&self, base: &FlagSet) -> Result<Resolution, ResolveError> {
        self.resolve_enabled(base.active())
    }

    fn close(&self, mut flags: FlagSet) -> Result<Resolution, ResolveError> {
        let vocabulary = Arc::clone(flags.vocabulary());
        let limit = self.config.effective_pass_limit(vocabulary.len());
        let explicit: Vec<bool> = flags.iter().map(|(_, active)| active).collect();
        let mut derived_by = vec![None; vocabulary.len()];
        let mut passes = 0;

        trace_resolve_start(flags.count_active(), self.table.len(), limit);

        loop {
            if passes == limit {
                trace_non_convergence(passes, limit);
                return Err(ResolveError::NonConvergence { passes, limit });
            }
            passes += 1;

            let mut activated = 0;
            for rule in self.table.compiled() {
                let consequent = rule.consequent();
                if flags.is_set(consequent) || !rule.holds(&flags) {
                    continue;
                }
                flags.activate(consequent);
                derived_by[consequent.index()] = Some(rule.index());
                activated += 1;
                trace_rule_fired(
                    passes,
                    rule.index(),
                    vocabulary.name(consequent).unwrap_or_default(),
                );
            }

            trace_pass_complete(passes, activated);
            if activated == 0 {
                break;
            }
        }

        let derived = derived_by.iter().filter(|rule| rule.is_some()).count();
        trace_resolve_complete(passes, flags.count_active(), derived);

        Ok(Resolution::new(flags, explicit, derived_by, passes))
    }
}
