//! Create-board form state and validation.

use std::collections::HashSet;

use taskboard_core::{normalize_name, word_count, FieldErrors, FormField, TextInput};

use crate::board::{Board, NewBoard, DEFAULT_COLUMNS};

pub const MAX_NAME_WORDS: usize = 100;
pub const MAX_DESCRIPTION_WORDS: usize = 1000;

/// Trim labels and drop blank ones, keeping order.
pub fn clean_columns<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .map(|column| column.as_ref().trim())
        .filter(|column| !column.is_empty())
        .map(String::from)
        .collect()
}

/// Validate a new board against the boards that already exist.
///
/// Column labels are expected to be cleaned already (see [`clean_columns`]).
pub fn validate_board(board: &NewBoard, existing: &[Board]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = board.name.trim();
    if name.is_empty() {
        errors.add(FormField::Name, "Board name is required");
    } else if word_count(name) > MAX_NAME_WORDS {
        errors.add(FormField::Name, "Board name must be 100 words or less");
    } else {
        let wanted = normalize_name(name);
        if existing.iter().any(|b| normalize_name(&b.name) == wanted) {
            errors.add(FormField::Name, "A board with this name already exists");
        }
    }

    let description = board.description.trim();
    if description.is_empty() {
        errors.add(FormField::Description, "Description is required");
    } else if word_count(description) > MAX_DESCRIPTION_WORDS {
        errors.add(
            FormField::Description,
            "Description must be 1000 words or less",
        );
    }

    if board.columns.iter().all(|column| column.trim().is_empty()) {
        errors.add(FormField::Columns, "At least one column is required");
    } else {
        let mut seen = HashSet::new();
        if !board.columns.iter().all(|column| seen.insert(column.trim())) {
            errors.add(FormField::Columns, "Column names must be unique");
        }
    }

    errors.into_result()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardFormFocus {
    #[default]
    Name,
    Description,
    Column(usize),
}

#[derive(Debug, Clone)]
pub struct BoardForm {
    pub name: TextInput,
    pub description: TextInput,
    pub columns: Vec<TextInput>,
    pub focus: BoardFormFocus,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl Default for BoardForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardForm {
    /// Empty name and description with the four default columns.
    pub fn new() -> Self {
        Self {
            name: TextInput::new(),
            description: TextInput::multiline(),
            columns: DEFAULT_COLUMNS.iter().map(|c| TextInput::with_text(*c)).collect(),
            focus: BoardFormFocus::default(),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn add_column(&mut self) {
        self.columns.push(TextInput::new());
        self.focus = BoardFormFocus::Column(self.columns.len() - 1);
    }

    /// Remove a column. The last remaining column cannot be removed.
    pub fn remove_column(&mut self, index: usize) -> bool {
        if self.columns.len() <= 1 || index >= self.columns.len() {
            return false;
        }
        self.columns.remove(index);
        if let BoardFormFocus::Column(focused) = self.focus {
            if focused >= self.columns.len() {
                self.focus = BoardFormFocus::Column(self.columns.len() - 1);
            }
        }
        true
    }

    pub fn update_column(&mut self, index: usize, label: impl Into<String>) {
        if let Some(column) = self.columns.get_mut(index) {
            column.set(label);
            self.errors.clear(FormField::Columns);
        }
    }

    pub fn to_new_board(&self) -> NewBoard {
        let labels: Vec<&str> = self.columns.iter().map(TextInput::as_str).collect();
        NewBoard {
            name: self.name.as_str().trim().to_string(),
            description: self.description.as_str().trim().to_string(),
            columns: clean_columns(&labels),
        }
    }

    pub fn submit(&mut self, existing: &[Board]) -> Option<NewBoard> {
        let board = self.to_new_board();
        match validate_board(&board, existing) {
            Ok(()) => {
                self.errors = FieldErrors::new();
                self.submitting = true;
                Some(board)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            BoardFormFocus::Name => BoardFormFocus::Description,
            BoardFormFocus::Description => BoardFormFocus::Column(0),
            BoardFormFocus::Column(i) if i + 1 < self.columns.len() => BoardFormFocus::Column(i + 1),
            BoardFormFocus::Column(_) => BoardFormFocus::Name,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            BoardFormFocus::Name => BoardFormFocus::Column(self.columns.len().saturating_sub(1)),
            BoardFormFocus::Description => BoardFormFocus::Name,
            BoardFormFocus::Column(0) => BoardFormFocus::Description,
            BoardFormFocus::Column(i) => BoardFormFocus::Column(i - 1),
        };
    }

    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            BoardFormFocus::Name => Some(&mut self.name),
            BoardFormFocus::Description => Some(&mut self.description),
            BoardFormFocus::Column(i) => self.columns.get_mut(i),
        }
    }

    pub fn failed(&mut self) {
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_board(name: &str) -> NewBoard {
        NewBoard {
            name: name.into(),
            description: "Q1 work".into(),
            columns: vec!["To Do".into(), "Done".into()],
        }
    }

    fn existing() -> Vec<Board> {
        vec![Board::new(1, "Sprint 1", vec!["To Do".into()])]
    }

    #[test]
    fn test_name_uniqueness_is_case_insensitive_and_trimmed() {
        let errors = validate_board(&new_board("  sprint 1 "), &existing()).unwrap_err();
        assert_eq!(
            errors.get(FormField::Name),
            Some("A board with this name already exists")
        );
        assert!(validate_board(&new_board("Sprint 2"), &existing()).is_ok());
    }

    #[test]
    fn test_name_word_boundary() {
        let hundred = vec!["word"; 100].join(" ");
        assert!(validate_board(&new_board(&hundred), &[]).is_ok());
        let hundred_one = vec!["word"; 101].join(" ");
        let errors = validate_board(&new_board(&hundred_one), &[]).unwrap_err();
        assert_eq!(
            errors.get(FormField::Name),
            Some("Board name must be 100 words or less")
        );
    }

    #[test]
    fn test_required_fields_reported_together() {
        let board = NewBoard {
            name: " ".into(),
            description: String::new(),
            columns: vec![],
        };
        let errors = validate_board(&board, &[]).unwrap_err();
        assert_eq!(errors.get(FormField::Name), Some("Board name is required"));
        assert_eq!(errors.get(FormField::Description), Some("Description is required"));
        assert_eq!(errors.get(FormField::Columns), Some("At least one column is required"));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let mut board = new_board("B");
        board.columns = vec!["Done".into(), "Done".into()];
        let errors = validate_board(&board, &[]).unwrap_err();
        assert!(errors.contains(FormField::Columns));
    }

    #[test]
    fn test_form_starts_with_default_columns() {
        let form = BoardForm::new();
        let labels: Vec<_> = form.columns.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, DEFAULT_COLUMNS);
    }

    #[test]
    fn test_cannot_remove_last_column() {
        let mut form = BoardForm::new();
        for _ in 0..3 {
            assert!(form.remove_column(0));
        }
        assert_eq!(form.columns.len(), 1);
        assert!(!form.remove_column(0));
    }

    #[test]
    fn test_submit_trims_and_drops_blank_columns() {
        let mut form = BoardForm::new();
        form.name.set("Sprint 1");
        form.description.set("Q1 work");
        form.update_column(1, "  Doing  ");
        form.update_column(2, "   ");
        let board = form.submit(&[]).unwrap();
        assert_eq!(board.columns, vec!["To Do", "Doing", "Done"]);
        assert!(form.submitting);
    }

    #[test]
    fn test_all_blank_columns_blocks_submit() {
        let mut form = BoardForm::new();
        form.name.set("B");
        form.description.set("d");
        for i in 0..form.columns.len() {
            form.update_column(i, "");
        }
        assert!(form.submit(&[]).is_none());
        assert!(form.errors.contains(FormField::Columns));
    }
}
