use std::sync::Arc;

use crate::{
    CompiledPredicate, FlagId, FlagState, Rule, TableError, Vocabulary,
    debug_table::{trace_rule_compiled, trace_rule_rejected, trace_table_built},
};

/// A [`Rule`] with its names resolved to [`FlagId`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompiledRule {
    index: usize,
    consequent: FlagId,
    predicate: CompiledPredicate,
}

impl CompiledRule {
    /// Position of the source rule in the table.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The flag activated when the predicate holds.
    #[must_use]
    pub const fn consequent(&self) -> FlagId {
        self.consequent
    }

    /// The compiled condition.
    #[must_use]
    pub const fn predicate(&self) -> &CompiledPredicate {
        &self.predicate
    }

    /// Returns `true` when the predicate holds for `state`.
    pub fn holds<S: FlagState + ?Sized>(&self, state: &S) -> bool {
        self.predicate.evaluate(state)
    }
}

#[derive(Debug)]
struct RuleTableInner {
    vocabulary: Arc<Vocabulary>,
    rules: Vec<Rule>,
    compiled: Vec<CompiledRule>,
    derived_by: Vec<Option<usize>>,
}

/// Validated, immutable catalogue of implication rules.
///
/// Tables are built once through [`RuleTable::new`] and never change
/// afterwards. Cloning is cheap (the contents sit behind an [`Arc`]) and a
/// table may be read from any number of threads at once.
///
/// Construction rejects rules that:
///
/// - mention a flag outside the vocabulary;
/// - read their own consequent;
/// - negate a flag that some rule derives. Negation is only allowed on flags
///   the caller controls directly, which keeps the closure independent of
///   evaluation order.
///
/// # Examples
///
/// ```
/// use rules::{Predicate, Rule, RuleTable, Vocabulary};
///
/// let vocabulary = Vocabulary::new(["PARSE", "ECP", "COMPRESSED"]).unwrap();
/// let table = RuleTable::new(
///     vocabulary,
///     [Rule::new("COMPRESSED", Predicate::all(["PARSE", "ECP"]))],
/// )
/// .unwrap();
///
/// assert_eq!(table.len(), 1);
/// assert!(table.is_derived("COMPRESSED"));
/// assert!(!table.is_derived("PARSE"));
/// ```
#[derive(Clone, Debug)]
pub struct RuleTable {
    inner: Arc<RuleTableInner>,
}

impl RuleTable {
    /// Validates and compiles `rules` against `vocabulary`.
    ///
    /// Rules keep the order in which they are supplied.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found, checking rules in order.
    pub fn new<I>(vocabulary: Vocabulary, rules: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let rules: Vec<Rule> = rules.into_iter().collect();
        let mut compiled = Vec::with_capacity(rules.len());
        let mut derived_by = vec![None; vocabulary.len()];

        for (index, rule) in rules.iter().enumerate() {
            let compiled_rule =
                compile_rule(&vocabulary, index, rule).inspect_err(trace_rule_rejected)?;
            derived_by[compiled_rule.consequent.index()].get_or_insert(index);
            trace_rule_compiled(index, rule.consequent(), rule.predicate().flags().len());
            compiled.push(compiled_rule);
        }

        for (index, rule) in rules.iter().enumerate() {
            check_negations(&vocabulary, &derived_by, index, rule)
                .inspect_err(trace_rule_rejected)?;
        }

        trace_table_built(
            vocabulary.len(),
            rules.len(),
            derived_by.iter().filter(|rule| rule.is_some()).count(),
        );

        Ok(Self {
            inner: Arc::new(RuleTableInner {
                vocabulary: Arc::new(vocabulary),
                rules,
                compiled,
                derived_by,
            }),
        })
    }

    /// Returns the vocabulary the rules were validated against.
    #[must_use]
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.inner.vocabulary
    }

    /// Returns every rule in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.inner.rules
    }

    /// Returns the compiled rules, index-aligned with [`rules`](Self::rules).
    #[must_use]
    pub fn compiled(&self) -> &[CompiledRule] {
        &self.inner.compiled
    }

    /// Returns the rule at `index`.
    #[must_use]
    pub fn rule(&self, index: usize) -> Option<&Rule> {
        self.inner.rules.get(index)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.rules.len()
    }

    /// Returns `true` when the table holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.rules.is_empty()
    }

    /// Returns `true` when at least one rule activates `name`.
    #[must_use]
    pub fn is_derived(&self, name: &str) -> bool {
        self.inner
            .vocabulary
            .lookup(name)
            .is_some_and(|id| self.inner.derived_by[id.index()].is_some())
    }

    /// Iterates over the rules that activate `name`, with their positions.
    pub fn rules_deriving<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.inner
            .rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.consequent() == name)
    }
}

fn compile_rule(
    vocabulary: &Vocabulary,
    index: usize,
    rule: &Rule,
) -> Result<CompiledRule, TableError> {
    let consequent = vocabulary
        .lookup(rule.consequent())
        .ok_or_else(|| TableError::UnknownFlag {
            rule: index,
            name: rule.consequent().to_owned(),
        })?;

    let predicate = rule
        .predicate()
        .compile(&|name| vocabulary.lookup(name))
        .map_err(|name| TableError::UnknownFlag { rule: index, name })?;

    if rule.is_self_referential() {
        return Err(TableError::SelfReference {
            rule: index,
            flag: rule.consequent().to_owned(),
        });
    }

    Ok(CompiledRule {
        index,
        consequent,
        predicate,
    })
}

fn check_negations(
    vocabulary: &Vocabulary,
    derived_by: &[Option<usize>],
    index: usize,
    rule: &Rule,
) -> Result<(), TableError> {
    let mut violation = None;
    rule.predicate().visit(false, &mut |name, negated| {
        if !negated || violation.is_some() {
            return;
        }
        let deriving_rule = vocabulary
            .lookup(name)
            .and_then(|id| derived_by[id.index()]);
        if let Some(deriving_rule) = deriving_rule {
            violation = Some(TableError::NegatedDerivedFlag {
                rule: index,
                flag: name.to_owned(),
                deriving_rule,
            });
        }
    });
    violation.map_or(Ok(()), Err)
}
