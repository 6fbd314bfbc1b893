//! Curriculum loading.
//!
//! Structure:
//! - Pure functions: resource path computation, YAML parsing
//! - Effect functions: reading the per-category files
//!
//! Loading is fail-fast. The first category that cannot be read or parsed
//! aborts the whole load; no partially built curriculum is returned.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::types::{Category, Curriculum, Group};

/// File extension of category resources.
const RESOURCE_EXTENSION: &str = "yaml";

// ============================================================================
// ERRORS
// ============================================================================

/// Fatal error while loading the curriculum.
#[derive(Debug)]
pub enum LoadError {
    /// Backing file is missing or unreadable.
    Source {
        category: Category,
        path: PathBuf,
        source: io::Error,
    },
    /// Backing file was read but does not have the expected record shape.
    Format {
        category: Category,
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl LoadError {
    /// The category whose resource failed.
    pub fn category(&self) -> Category {
        match self {
            LoadError::Source { category, .. } | LoadError::Format { category, .. } => *category,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Source { category, path, source } => write!(
                f,
                "cannot read category '{}' from {}: {}",
                category,
                path.display(),
                source
            ),
            LoadError::Format { category, path, source } => write!(
                f,
                "malformed category '{}' in {}: {}",
                category,
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Source { source, .. } => Some(source),
            LoadError::Format { source, .. } => Some(source),
        }
    }
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Path of a category's backing file inside `data_dir`.
pub fn resource_path(data_dir: &Path, category: Category) -> PathBuf {
    data_dir.join(format!("{}.{}", category.resource_name(), RESOURCE_EXTENSION))
}

/// Parse one category resource: a list of `{group, subjects}` records.
///
/// Missing `required`, `JABEE` and `earn_credit` default to false.
/// An empty document is an empty list.
pub fn parse_groups(text: &str) -> Result<Vec<Group>, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(text)
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Load every requested category from `data_dir`.
///
/// Categories are read in the given order; the first failure is returned.
pub fn load_curriculum(data_dir: &Path, categories: &[Category]) -> Result<Curriculum, LoadError> {
    let mut loaded = Vec::with_capacity(categories.len());

    for &category in categories {
        let groups = load_category(data_dir, category)?;
        debug!("Loaded {} groups for {}", groups.len(), category);
        loaded.push((category, groups));
    }

    info!(
        "Loaded {} categories from {}",
        loaded.len(),
        data_dir.display()
    );
    Ok(Curriculum::from_categories(loaded))
}

/// Read and parse a single category's backing file.
pub fn load_category(data_dir: &Path, category: Category) -> Result<Vec<Group>, LoadError> {
    let path = resource_path(data_dir, category);

    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(source) => return Err(LoadError::Source { category, path, source }),
    };

    parse_groups(&text).map_err(|source| LoadError::Format { category, path, source })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SPECIALIZED_YAML: &str = "\
- group: Core
  subjects:
    - name: Algorithms
      credits: 2
      required: true
      JABEE: true
    - name: Compilers
      credits: 2
      earn_credit: true
- group: Electives
  subjects: []
";

    fn write_category(dir: &Path, category: Category, content: &str) {
        fs::write(resource_path(dir, category), content).unwrap();
    }

    #[test]
    fn test_resource_path_uses_category_name() {
        let path = resource_path(Path::new("data"), Category::Specialized);
        assert_eq!(path, PathBuf::from("data/専門科目.yaml"));
    }

    #[test]
    fn test_parse_groups_reads_flags_and_defaults() {
        let groups = parse_groups(SPECIALIZED_YAML).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Core");

        let algorithms = &groups[0].subjects[0];
        assert_eq!(algorithms.name, "Algorithms");
        assert_eq!(algorithms.credits, 2);
        assert!(algorithms.required);
        assert!(algorithms.jabee_required);
        assert!(!algorithms.earned);

        let compilers = &groups[0].subjects[1];
        assert!(!compilers.required);
        assert!(!compilers.jabee_required);
        assert!(compilers.earned);

        assert!(groups[1].subjects.is_empty());
    }

    #[test]
    fn test_parse_groups_preserves_order() {
        let groups = parse_groups(SPECIALIZED_YAML).unwrap();
        let names: Vec<_> = groups[0].subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Algorithms", "Compilers"]);
    }

    #[test]
    fn test_parse_groups_empty_document() {
        assert!(parse_groups("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_groups_rejects_missing_credits() {
        let text = "- group: Core\n  subjects:\n    - name: X\n";
        assert!(parse_groups(text).is_err());
    }

    #[test]
    fn test_parse_groups_rejects_negative_credits() {
        let text = "- group: Core\n  subjects:\n    - name: X\n      credits: -1\n";
        assert!(parse_groups(text).is_err());
    }

    #[test]
    fn test_load_curriculum_reads_all_categories() {
        let temp = TempDir::new().unwrap();
        write_category(temp.path(), Category::Specialized, SPECIALIZED_YAML);
        write_category(temp.path(), Category::HumanitiesSocialEnglish, "[]");
        write_category(
            temp.path(),
            Category::MathScienceIt,
            "- group: Math\n  subjects:\n    - name: Calculus\n      credits: 4\n",
        );

        let curriculum = load_curriculum(temp.path(), &Category::ALL).unwrap();

        assert_eq!(curriculum.categories().collect::<Vec<_>>(), Category::ALL.to_vec());
        assert_eq!(curriculum.groups(Category::Specialized).len(), 2);
        assert!(curriculum.groups(Category::HumanitiesSocialEnglish).is_empty());
        assert_eq!(curriculum.groups(Category::MathScienceIt)[0].subjects[0].credits, 4);
    }

    #[test]
    fn test_load_curriculum_fails_fast_on_missing_category() {
        let temp = TempDir::new().unwrap();
        write_category(temp.path(), Category::Specialized, SPECIALIZED_YAML);
        write_category(temp.path(), Category::MathScienceIt, "[]");

        let err = load_curriculum(temp.path(), &Category::ALL).unwrap_err();

        assert!(matches!(err, LoadError::Source { .. }));
        assert_eq!(err.category(), Category::HumanitiesSocialEnglish);
        assert!(err.to_string().contains("人文・社会科学及び英語科目群"));
    }

    #[test]
    fn test_load_curriculum_reports_format_error() {
        let temp = TempDir::new().unwrap();
        write_category(temp.path(), Category::Specialized, "group: not-a-list");

        let err = load_curriculum(temp.path(), &[Category::Specialized]).unwrap_err();

        assert!(matches!(err, LoadError::Format { .. }));
        assert_eq!(err.category(), Category::Specialized);
        assert!(err.to_string().starts_with("malformed category"));
    }

    #[test]
    fn test_bundled_sample_data_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::types::DEFAULT_DATA_DIR);
        let curriculum = load_curriculum(&dir, &Category::ALL).unwrap();
        for category in Category::ALL {
            assert!(!curriculum.groups(category).is_empty(), "{} is empty", category);
        }
    }

    #[test]
    fn test_load_curriculum_with_no_categories_is_empty() {
        let temp = TempDir::new().unwrap();
        let curriculum = load_curriculum(temp.path(), &[]).unwrap();
        assert_eq!(curriculum.categories().count(), 0);
    }
}
