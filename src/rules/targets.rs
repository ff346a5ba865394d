//! Rule Targets
//!
//! Which cart lines a rule looks at: everything, an explicit item list, a set of
//! categories, or any mix of the last two.

use rustc_hash::FxHashSet;

use crate::{cart::CartLine, categories::CategorySet};

/// Item / category targeting for purchase or reward lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    all: bool,
    items: FxHashSet<String>,
    categories: CategorySet,
}

impl Targets {
    /// Target every line in the cart.
    #[must_use]
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Target lines whose item id is listed or that share a listed category.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = String>, categories: CategorySet) -> Self {
        Self {
            all: false,
            items: items.into_iter().collect(),
            categories,
        }
    }

    /// Target an explicit list of item ids.
    #[cfg(test)]
    pub(crate) fn items(items: &[&str]) -> Self {
        Self::new(items.iter().map(ToString::to_string), CategorySet::default())
    }

    /// Target a list of category ids.
    #[cfg(test)]
    pub(crate) fn categories(categories: &[&str]) -> Self {
        Self::new([], CategorySet::from_strs(categories))
    }

    /// Returns true if every line is targeted.
    #[cfg(test)]
    pub(crate) fn targets_all(&self) -> bool {
        self.all
    }

    /// Returns true if nothing can ever match.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        !self.all && self.items.is_empty() && self.categories.is_empty()
    }

    /// Returns true if the line is targeted.
    ///
    /// Item or category references that no longer exist in the catalog simply never match.
    pub fn matches(&self, line: &CartLine<'_>) -> bool {
        self.all
            || self.items.contains(line.item_id())
            || line.categories().intersects(&self.categories)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    fn line(item: &str, categories: &[&str]) -> Result<CartLine<'static>, crate::cart::CartError> {
        CartLine::new(
            item,
            item,
            CategorySet::from_strs(categories),
            Money::from_minor(1_000, USD),
            1,
        )
    }

    #[test]
    fn all_matches_every_line() -> TestResult {
        assert!(Targets::all().matches(&line("soup", &[])?));
        assert!(Targets::all().targets_all());

        Ok(())
    }

    #[test]
    fn matches_by_item_id() -> TestResult {
        let targets = Targets::items(&["soup"]);

        assert!(targets.matches(&line("soup", &["starters"])?));
        assert!(!targets.matches(&line("salad", &["starters"])?));

        Ok(())
    }

    #[test]
    fn matches_by_any_shared_category() -> TestResult {
        let targets = Targets::categories(&["drinks", "desserts"]);

        assert!(targets.matches(&line("cola", &["cold", "drinks"])?));
        assert!(!targets.matches(&line("steak", &["mains"])?));

        Ok(())
    }

    #[test]
    fn unresolved_references_do_not_match() -> TestResult {
        let targets = Targets::new(
            ["deleted-item".to_string()],
            CategorySet::from_strs(&["deleted-category"]),
        );

        assert!(!targets.is_empty());
        assert!(!targets.matches(&line("soup", &["starters"])?));

        Ok(())
    }

    #[test]
    fn empty_targets_match_nothing() -> TestResult {
        let targets = Targets::default();

        assert!(targets.is_empty());
        assert!(!targets.matches(&line("soup", &[])?));

        Ok(())
    }
}
