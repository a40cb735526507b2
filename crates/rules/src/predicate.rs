use std::fmt;
use std::ops::Not;

use crate::FlagId;

/// Read access to the activation state of flags.
///
/// Compiled predicates evaluate against any implementor, which lets the
/// resolver hand its working set to the rule table without copying it.
pub trait FlagState {
    /// Returns `true` when `flag` is currently active.
    fn is_active(&self, flag: FlagId) -> bool;
}

impl FlagState for [bool] {
    fn is_active(&self, flag: FlagId) -> bool {
        self.get(flag.index()).copied().unwrap_or(false)
    }
}

impl<T: FlagState + ?Sized> FlagState for &T {
    fn is_active(&self, flag: FlagId) -> bool {
        (**self).is_active(flag)
    }
}

/// Boolean expression over flag names.
///
/// An empty [`All`](Self::All) is always true and an empty
/// [`Any`](Self::Any) is always false, so `Predicate::all([])` expresses an
/// unconditional rule.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Predicate {
    /// The named flag is active.
    Flag(String),
    /// Every child holds.
    All(Vec<Predicate>),
    /// At least one child holds.
    Any(Vec<Predicate>),
    /// The child does not hold.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Leaf predicate that holds when `name` is active.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        Self::Flag(name.into())
    }

    /// Conjunction of `children`.
    #[must_use]
    pub fn all<I, P>(children: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Self>,
    {
        Self::All(children.into_iter().map(Into::into).collect())
    }

    /// Disjunction of `children`.
    #[must_use]
    pub fn any<I, P>(children: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Self>,
    {
        Self::Any(children.into_iter().map(Into::into).collect())
    }

    /// Negation of `child`.
    #[must_use]
    pub fn negate(child: impl Into<Self>) -> Self {
        Self::Not(Box::new(child.into()))
    }

    /// Returns every flag name referenced by the predicate, depth first.
    ///
    /// Names appear once per reference, so a flag mentioned twice is listed
    /// twice.
    #[must_use]
    pub fn flags(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.visit(false, &mut |name, _| names.push(name));
        names
    }

    /// Returns `true` when `name` is read anywhere in the predicate.
    #[must_use]
    pub fn references(&self, name: &str) -> bool {
        let mut found = false;
        self.visit(false, &mut |candidate, _| found |= candidate == name);
        found
    }

    /// Walks the leaves, reporting whether each sits under an odd number of
    /// negations.
    pub(crate) fn visit<'a>(&'a self, negated: bool, visitor: &mut impl FnMut(&'a str, bool)) {
        match self {
            Self::Flag(name) => visitor(name, negated),
            Self::All(children) | Self::Any(children) => {
                for child in children {
                    child.visit(negated, visitor);
                }
            }
            Self::Not(child) => child.visit(!negated, visitor),
        }
    }

    /// Resolves flag names to identifiers, reporting the first unknown name.
    pub(crate) fn compile(
        &self,
        lookup: &impl Fn(&str) -> Option<FlagId>,
    ) -> Result<CompiledPredicate, String> {
        Ok(match self {
            Self::Flag(name) => CompiledPredicate::Flag(lookup(name).ok_or_else(|| name.clone())?),
            Self::All(children) => CompiledPredicate::All(
                children
                    .iter()
                    .map(|child| child.compile(lookup))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Any(children) => CompiledPredicate::Any(
                children
                    .iter()
                    .map(|child| child.compile(lookup))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Not(child) => CompiledPredicate::Not(Box::new(child.compile(lookup)?)),
        })
    }
}

impl From<&str> for Predicate {
    fn from(name: &str) -> Self {
        Self::flag(name)
    }
}

impl From<String> for Predicate {
    fn from(name: String) -> Self {
        Self::Flag(name)
    }
}

impl Not for Predicate {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::negate(self)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(
            f: &mut fmt::Formatter<'_>,
            children: &[Predicate],
            separator: &str,
            empty: &str,
        ) -> fmt::Result {
            match children {
                [] => f.write_str(empty),
                [only] => write!(f, "{only}"),
                _ => {
                    f.write_str("(")?;
                    for (position, child) in children.iter().enumerate() {
                        if position > 0 {
                            f.write_str(separator)?;
                        }
                        write!(f, "{child}")?;
                    }
                    f.write_str(")")
                }
            }
        }

        match self {
            Self::Flag(name) => f.write_str(name),
            Self::All(children) => join(f, children, " && ", "true"),
            Self::Any(children) => join(f, children, " || ", "false"),
            Self::Not(child) => write!(f, "!{child}"),
        }
    }
}

/// [`Predicate`] with names resolved against a vocabulary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompiledPredicate {
    /// The flag is active.
    Flag(FlagId),
    /// Every child holds.
    All(Box<[CompiledPredicate]>),
    /// At least one child holds.
    Any(Box<[CompiledPredicate]>),
    /// The child does not hold.
    Not(Box<CompiledPredicate>),
}

impl CompiledPredicate {
    /// Evaluates the predicate against `state`.
    pub fn evaluate<S: FlagState + ?Sized>(&self, state: &S) -> bool {
        match self {
            Self::Flag(id) => state.is_active(*id),
            Self::All(children) => children.iter().all(|child| child.evaluate(state)),
            Self::Any(children) => children.iter().any(|child| child.evaluate(state)),
            Self::Not(child) => !child.evaluate(state),
        }
    }
}
