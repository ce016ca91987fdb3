// ── Store options ──
//
// Construction-time configuration: the identity field, the comparator,
// and the three pluggable providers a store leans on.

use std::fmt;
use std::rc::Rc;

use crate::error::CoreError;
use crate::identity::{IdentityAssigner, RandomIdentity};
use crate::query::{ExpressionMatcher, Matcher};
use crate::sort::{Comparator, FieldOrdering, NaturalOrder};

pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Options a store is built with. Cloning shares the providers.
#[derive(Clone)]
pub struct StoreOptions {
    /// Field holding each record's identity. Defaults to `"id"`.
    pub id_attribute: String,
    /// Ordering applied after every `add`. `None` keeps insertion order.
    pub comparator: Option<Comparator>,
    /// Field ordering used by field-name comparators.
    pub sorter: Rc<dyn FieldOrdering>,
    /// Matcher behind `filter`.
    pub matcher: Rc<dyn Matcher>,
    /// Source of identities for records added without one.
    pub identity: Rc<dyn IdentityAssigner>,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = id_attribute.into();
        self
    }

    pub fn with_comparator(mut self, comparator: impl Into<Comparator>) -> Self {
        self.comparator = Some(comparator.into());
        self
    }

    pub fn with_sorter(mut self, sorter: impl FieldOrdering + 'static) -> Self {
        self.sorter = Rc::new(sorter);
        self
    }

    pub fn with_matcher(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matcher = Rc::new(matcher);
        self
    }

    pub fn with_identity(mut self, identity: impl IdentityAssigner + 'static) -> Self {
        self.identity = Rc::new(identity);
        self
    }

    /// Reject options no store can work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id_attribute.trim().is_empty() {
            return Err(CoreError::InvalidOption {
                option: "id_attribute".into(),
                reason: "must name a field".into(),
            });
        }
        Ok(())
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            id_attribute: DEFAULT_ID_ATTRIBUTE.into(),
            comparator: None,
            sorter: Rc::new(NaturalOrder),
            matcher: Rc::new(ExpressionMatcher),
            identity: Rc::new(RandomIdentity),
        }
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("id_attribute", &self.id_attribute)
            .field("comparator", &self.comparator)
            .finish_non_exhaustive()
    }
}

/// Per-call options for `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOptions {
    /// Resort after adding, when a comparator is configured.
    pub sort: bool,
}

impl AddOptions {
    pub const fn no_sort() -> Self {
        Self { sort: false }
    }
}

impl Default for AddOptions {
    fn default() -> Self {
        Self { sort: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = StoreOptions::default();
        assert_eq!(options.id_attribute, "id");
        assert!(options.comparator.is_none());
        assert!(options.validate().is_ok());
        assert!(AddOptions::default().sort);
    }

    #[test]
    fn blank_id_attribute_is_invalid() {
        let options = StoreOptions::new().with_id_attribute("  ");
        assert!(matches!(
            options.validate(),
            Err(CoreError::InvalidOption { .. })
        ));
    }
}
