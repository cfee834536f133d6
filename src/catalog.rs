//! Once-only startup product: the loaded knowledge base and its menu

use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::menu::MenuIndex;
use std::path::Path;
use std::sync::Arc;

/// Diagnostic shown instead of a menu when the data file failed to load
pub const DATA_UNAVAILABLE: &str =
    "The FAQ data could not be loaded, so no menu is available. Please contact the site owner.";

/// Knowledge base plus the menu built from it. Never mutated after construction.
#[derive(Debug)]
pub struct Catalog {
    knowledge: KnowledgeBase,
    menu: MenuIndex,
    prompt_text: String,
}

impl Catalog {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        let menu = MenuIndex::build(knowledge.records());
        let prompt_text = knowledge.prompt_text();
        Self {
            knowledge,
            menu,
            prompt_text,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn menu(&self) -> &MenuIndex {
        &self.menu
    }

    /// Records flattened for use as model context
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }
}

/// Outcome of the startup load. Failures are terminal for every session.
#[derive(Debug, Clone)]
pub enum CatalogStatus {
    Ready(Arc<Catalog>),
    Unavailable { reason: String },
}

impl CatalogStatus {
    /// Load the data file and build the menu, or record why that failed
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match KnowledgeBase::load(path) {
            Ok(knowledge) => {
                let catalog = Catalog::new(knowledge);
                tracing::info!(
                    subjects = catalog.menu().subject_count(),
                    records = catalog.knowledge().len(),
                    "Catalog ready"
                );
                Self::Ready(Arc::new(catalog))
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Catalog unavailable");
                Self::unavailable(&e)
            }
        }
    }

    pub fn unavailable(error: &KnowledgeError) -> Self {
        Self::Unavailable {
            reason: error.to_string(),
        }
    }

    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_ready() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "subject,question,answer").unwrap();
        writeln!(file, "Math,2+2?,4").unwrap();

        let status = CatalogStatus::load(file.path());
        let catalog = status.catalog().unwrap();
        assert_eq!(catalog.menu().subject_count(), 1);
        assert_eq!(catalog.knowledge().lookup_answer("2+2?"), "4");
        assert!(catalog.prompt_text().contains("answer: 4"));
    }

    #[test]
    fn test_load_missing_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let status = CatalogStatus::load(dir.path().join("nope.csv"));
        assert!(!status.is_ready());
        match status {
            CatalogStatus::Unavailable { reason } => assert!(reason.contains("nope.csv")),
            CatalogStatus::Ready(_) => panic!("expected unavailable"),
        }
    }

    #[test]
    fn test_schema_error_builds_no_menu() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "subject,answer").unwrap();
        writeln!(file, "Math,4").unwrap();

        let status = CatalogStatus::load(file.path());
        assert!(status.catalog().is_none());
    }
}
