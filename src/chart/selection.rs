use crate::analysis::{Category, CATEGORY_COUNT};
use crate::error::Result;

/// Categories chosen for charting. Always iterated in the fixed category order,
/// no matter the order keys were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSelection {
    selected: [bool; CATEGORY_COUNT],
}

impl ChartSelection {
    pub fn none() -> Self {
        Self {
            selected: [false; CATEGORY_COUNT],
        }
    }

    pub fn all() -> Self {
        Self {
            selected: [true; CATEGORY_COUNT],
        }
    }

    pub fn from_categories<I: IntoIterator<Item = Category>>(categories: I) -> Self {
        let mut selection = Self::none();
        for category in categories {
            selection.insert(category);
        }
        selection
    }

    /// Parse keys such as `"commas"`. Unknown keys are an error.
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Result<Self> {
        let mut selection = Self::none();
        for key in keys {
            selection.insert(key.as_ref().parse()?);
        }
        Ok(selection)
    }

    /// Parse a comma-separated list; blank entries are ignored.
    pub fn parse(list: &str) -> Result<Self> {
        let keys: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect();
        Self::from_keys(&keys)
    }

    pub fn insert(&mut self, category: Category) {
        self.selected[category.index()] = true;
    }

    pub fn remove(&mut self, category: Category) {
        self.selected[category.index()] = false;
    }

    pub fn contains(&self, category: Category) -> bool {
        self.selected[category.index()]
    }

    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| self.contains(*c))
            .collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.categories()
            .into_iter()
            .map(|c| c.key().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChartSelection {
    fn default() -> Self {
        Self::from_categories([
            Category::Commas,
            Category::FullStops,
            Category::QuestionMarks,
        ])
    }
}
