//! Domain types for syllabus-tui.
//!
//! The curriculum is loaded once and keeps its shape for the whole session.
//! The only field that ever changes after load is [`Subject::earned`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

// ============================================================================
// CATEGORIES
// ============================================================================

/// Top-level curriculum type. Each one is backed by its own resource.
///
/// Variant order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// 専門科目
    Specialized,
    /// 人文・社会科学及び英語科目群
    HumanitiesSocialEnglish,
    /// 数学・自然科学・情報技術系科目群
    MathScienceIt,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 3] = [
        Category::Specialized,
        Category::HumanitiesSocialEnglish,
        Category::MathScienceIt,
    ];

    /// Resource name; the backing file is `<name>.yaml`.
    pub fn resource_name(self) -> &'static str {
        match self {
            Category::Specialized => "専門科目",
            Category::HumanitiesSocialEnglish => "人文・社会科学及び英語科目群",
            Category::MathScienceIt => "数学・自然科学・情報技術系科目群",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_name())
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One course entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subject {
    pub name: String,
    pub credits: u32,
    #[serde(default)]
    pub required: bool,
    /// Accreditation flag. Static, never toggled.
    #[serde(rename = "JABEE", default)]
    pub jabee_required: bool,
    /// Whether the student has completed the course.
    #[serde(rename = "earn_credit", default)]
    pub earned: bool,
}

impl Subject {
    /// Create a subject with all flags cleared.
    pub fn new(name: impl Into<String>, credits: u32) -> Self {
        Subject {
            name: name.into(),
            credits,
            required: false,
            jabee_required: false,
            earned: false,
        }
    }
}

/// A named set of subjects, rendered as one table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    #[serde(rename = "group")]
    pub label: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Group {
    pub fn new(label: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Group {
            label: label.into(),
            subjects,
        }
    }
}

/// Stable address of one group inside a [`Curriculum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupHandle {
    pub category: Category,
    /// Index into the category's group list.
    pub index: usize,
}

// ============================================================================
// CURRICULUM
// ============================================================================

/// The full loaded dataset.
///
/// Categories are independent and never merged. Group order within a
/// category and subject order within a group are fixed after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curriculum {
    categories: BTreeMap<Category, Vec<Group>>,
}

impl Curriculum {
    /// Build a curriculum from already-parsed categories.
    pub fn from_categories(categories: impl IntoIterator<Item = (Category, Vec<Group>)>) -> Self {
        Curriculum {
            categories: categories.into_iter().collect(),
        }
    }

    /// Categories present, in display order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.keys().copied()
    }

    /// Groups of a category. Empty if the category was not loaded.
    pub fn groups(&self, category: Category) -> &[Group] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn group(&self, handle: GroupHandle) -> Option<&Group> {
        self.groups(handle.category).get(handle.index)
    }

    /// Mutable access to one group's subjects.
    ///
    /// Hands out a slice, never the Vec, so the sequence cannot be
    /// resized or reordered through it.
    pub fn subjects_mut(&mut self, handle: GroupHandle) -> Option<&mut [Subject]> {
        self.categories
            .get_mut(&handle.category)?
            .get_mut(handle.index)
            .map(|g| g.subjects.as_mut_slice())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default directory holding the per-category YAML files.
pub const DEFAULT_DATA_DIR: &str = "original-syllabus";

/// Runtime settings for a viewer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Directory containing `<category>.yaml` files.
    pub data_dir: PathBuf,
    /// Categories to load, in display order.
    pub categories: Vec<Category>,
    /// Tables per grid row.
    pub tables_per_row: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            categories: Category::ALL.to_vec(),
            tables_per_row: crate::layout::DEFAULT_TABLES_PER_ROW,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Curriculum {
        Curriculum::from_categories([(
            Category::Specialized,
            vec![Group::new("Core", vec![Subject::new("X", 2)])],
        )])
    }

    #[test]
    fn category_order_matches_display_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn missing_category_has_no_groups() {
        let curriculum = sample();
        assert!(curriculum.groups(Category::MathScienceIt).is_empty());
    }

    #[test]
    fn subjects_mut_resolves_handle() {
        let mut curriculum = sample();
        let handle = GroupHandle {
            category: Category::Specialized,
            index: 0,
        };
        let subjects = curriculum.subjects_mut(handle).unwrap();
        subjects[0].earned = true;
        assert!(curriculum.group(handle).unwrap().subjects[0].earned);
    }

    #[test]
    fn subjects_mut_rejects_out_of_range_handle() {
        let mut curriculum = sample();
        let handle = GroupHandle {
            category: Category::Specialized,
            index: 5,
        };
        assert!(curriculum.subjects_mut(handle).is_none());
    }

    #[test]
    fn default_config_loads_every_category_three_per_row() {
        let config = ViewerConfig::default();
        assert_eq!(config.categories, Category::ALL.to_vec());
        assert_eq!(config.tables_per_row, 3);
        assert_eq!(config.data_dir, PathBuf::from("original-syllabus"));
    }
}
