use std::fmt;

use tracing::trace;

use super::predicate::Predicate;
use crate::error::{Error, Result};

/// How the next added predicate is combined with what is already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    #[default]
    And,
    Or,
}

/// Builder for composite predicates over an entity type.
///
/// Predicates added in [`Mode::And`] are collected as conjuncts (duplicates are
/// dropped); predicates added in [`Mode::Or`] are folded into a single
/// disjunct. [`build`](Self::build) ANDs the conjuncts together and ORs the
/// disjunct onto the result.
///
/// Switching to OR mode on a builder without conjuncts yields `true OR q`,
/// which matches every entity. Start with a conjunct, or put alternatives in a
/// subgroup.
///
/// # Example
///
/// ```
/// use siftflow::ConditionBuilder;
/// use siftflow::fragments::{compare, text};
///
/// struct Person { name: String, age: u32 }
///
/// let condition = ConditionBuilder::<Person>::new()
///     .add_field(|p| &p.age, compare::greater_than_or_equal(18_u32))?
///     .add_field(|p| &p.name, text::not_empty())?
///     .build();
///
/// assert!(condition.evaluate(&Person { name: "Ada".into(), age: 36 }));
/// assert!(!condition.evaluate(&Person { name: "Bo".into(), age: 12 }));
/// # Ok::<(), siftflow::Error>(())
/// ```
pub struct ConditionBuilder<T: ?Sized> {
    conjuncts: Vec<Predicate<T>>,
    disjunct: Option<Predicate<T>>,
    mode: Mode,
}

impl<T: ?Sized> Default for ConditionBuilder<T> {
    fn default() -> Self {
        Self {
            conjuncts: Vec::new(),
            disjunct: None,
            mode: Mode::And,
        }
    }
}

impl<T: ?Sized> ConditionBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate under the current mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPredicate`] if the predicate is a literal
    /// constant or a comparison against a literal zero.
    pub fn add(mut self, predicate: Predicate<T>) -> Result<Self> {
        reject_vacuous(&predicate)?;
        match self.mode {
            Mode::And => {
                if self.conjuncts.contains(&predicate) {
                    trace!(predicate = %predicate, "duplicate conjunct ignored");
                } else {
                    trace!(predicate = %predicate, "conjunct added");
                    self.conjuncts.push(predicate);
                }
            }
            Mode::Or => {
                trace!(predicate = %predicate, "disjunct added");
                self.disjunct = Some(match self.disjunct.take() {
                    Some(existing) => existing.or(predicate),
                    None => predicate,
                });
            }
        }
        Ok(self)
    }

    /// Add a nested group configured by `configure` as a single predicate.
    ///
    /// # Errors
    ///
    /// Propagates errors from `configure`. An empty group builds to `true` and
    /// is rejected with [`Error::InvalidPredicate`].
    pub fn add_subgroup(
        self,
        configure: impl FnOnce(ConditionBuilder<T>) -> Result<ConditionBuilder<T>>,
    ) -> Result<Self> {
        let group = configure(ConditionBuilder::new())?.build();
        trace!(group = %group, "subgroup built");
        self.add(group)
    }

    /// Switch to AND mode.
    #[must_use]
    pub fn and(mut self) -> Self {
        self.mode = Mode::And;
        self
    }

    /// Switch to OR mode.
    #[must_use]
    pub fn or(mut self) -> Self {
        self.mode = Mode::Or;
        self
    }

    /// Snapshot the current state as a predicate. An empty builder yields the
    /// always-true constant.
    #[must_use]
    pub fn build(&self) -> Predicate<T> {
        let conjunction = self
            .conjuncts
            .iter()
            .cloned()
            .reduce(Predicate::and)
            .unwrap_or_else(Predicate::always);
        match &self.disjunct {
            Some(disjunct) => conjunction.or(disjunct.clone()),
            None => conjunction,
        }
    }

    /// The logical negation of [`build`](Self::build).
    #[must_use]
    pub fn build_negated(&self) -> Predicate<T> {
        self.build().negate()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conjuncts.is_empty() && self.disjunct.is_none()
    }

    #[must_use]
    pub fn conjunct_count(&self) -> usize {
        self.conjuncts.len()
    }

    #[must_use]
    pub fn has_disjunct(&self) -> bool {
        self.disjunct.is_some()
    }
}

impl<T: ?Sized + 'static> ConditionBuilder<T> {
    /// Add a predicate on a field, reached from the entity through `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPredicate`] if the field predicate is vacuous.
    pub fn add_field<V, S>(self, selector: S, predicate: Predicate<V>) -> Result<Self>
    where
        V: ?Sized + 'static,
        S: Fn(&T) -> &V + Send + Sync + 'static,
    {
        reject_vacuous(&predicate)?;
        self.add(predicate.select(selector))
    }
}

impl<T: ?Sized> Clone for ConditionBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            conjuncts: self.conjuncts.clone(),
            disjunct: self.disjunct.clone(),
            mode: self.mode,
        }
    }
}

impl<T: ?Sized> fmt::Debug for ConditionBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionBuilder")
            .field("conjuncts", &self.conjuncts)
            .field("disjunct", &self.disjunct)
            .field("mode", &self.mode)
            .finish()
    }
}

fn reject_vacuous<V: ?Sized>(predicate: &Predicate<V>) -> Result<()> {
    match predicate.vacuity() {
        Some(vacuity) => Err(Error::InvalidPredicate(vacuity)),
        None => Ok(()),
    }
}
