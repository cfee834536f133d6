//! Two-level menu derived from the knowledge base
//!
//! Subjects and questions keep their first-occurrence order and receive
//! 1-based ordinal keys, so numbering is stable across reloads of the same
//! file.

use crate::knowledge::QaRecord;
use serde::Serialize;
use std::collections::HashMap;

/// One selectable menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub key: String,
    pub label: String,
}

impl MenuEntry {
    fn new(ordinal: usize, label: &str) -> Self {
        Self {
            key: ordinal.to_string(),
            label: label.to_string(),
        }
    }
}

/// Main menu of subjects plus one question menu per subject
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuIndex {
    main: Vec<MenuEntry>,
    subjects: HashMap<String, Vec<MenuEntry>>,
}

impl MenuIndex {
    /// Build the index in a single pass over `records`
    pub fn build(records: &[QaRecord]) -> Self {
        let mut main = Vec::new();
        let mut subjects: HashMap<String, Vec<MenuEntry>> = HashMap::new();

        for record in records {
            let questions = subjects.entry(record.subject.clone()).or_insert_with(|| {
                main.push(MenuEntry::new(main.len() + 1, &record.subject));
                Vec::new()
            });
            // Duplicate question text is kept; each copy gets its own key.
            questions.push(MenuEntry::new(questions.len() + 1, &record.question));
        }

        Self { main, subjects }
    }

    pub fn main_menu(&self) -> &[MenuEntry] {
        &self.main
    }

    /// Question menu for `subject`; empty when the subject is unknown
    pub fn sub_menu(&self, subject: &str) -> &[MenuEntry] {
        self.subjects
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.contains_key(subject)
    }

    pub fn has_question(&self, subject: &str, question: &str) -> bool {
        self.sub_menu(subject).iter().any(|e| e.label == question)
    }

    pub fn subject_count(&self) -> usize {
        self.main.len()
    }
}
