use std::fmt;

use rustc_hash::FxHashMap;

use crate::TableError;

/// Dense index of a flag inside its [`Vocabulary`].
///
/// Identifiers are only meaningful for the vocabulary that issued them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FlagId(usize);

impl FlagId {
    /// Returns the position of the flag in declaration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The finite set of flag names a rule table may mention.
///
/// Names keep their declaration order, which is also the order used when a
/// resolved flag set is iterated.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    names: Vec<Box<str>>,
    index: FxHashMap<Box<str>, FlagId>,
}

impl Vocabulary {
    /// Builds a vocabulary from `names`, rejecting duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rules::Vocabulary;
    ///
    /// let vocabulary = Vocabulary::new(["MD_C", "MD_LIGHT"]).unwrap();
    /// assert_eq!(vocabulary.len(), 2);
    /// assert!(Vocabulary::new(["MD_C", "MD_C"]).is_err());
    /// ```
    pub fn new<I, S>(names: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::default();
        for name in names {
            let name: Box<str> = name.into().into_boxed_str();
            if vocabulary.index.contains_key(&name) {
                return Err(TableError::DuplicateFlag {
                    name: name.into_string(),
                });
            }
            let id = FlagId(vocabulary.names.len());
            vocabulary.index.insert(name.clone(), id);
            vocabulary.names.push(name);
        }
        Ok(vocabulary)
    }

    /// Returns the identifier registered for `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<FlagId> {
        self.index.get(name).copied()
    }

    /// Returns `true` when `name` belongs to the vocabulary.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the name behind `id`, or `None` for an identifier issued by a
    /// larger vocabulary.
    #[must_use]
    pub fn name(&self, id: FlagId) -> Option<&str> {
        self.names.get(id.0).map(AsRef::as_ref)
    }

    /// Number of flags in the vocabulary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` when no flag has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over every flag in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (FlagId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (FlagId(index), name.as_ref()))
    }

    /// Iterates over the flag names in declaration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.names.iter().map(AsRef::as_ref)
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for Vocabulary {}
