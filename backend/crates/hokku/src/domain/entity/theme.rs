//! Theme Entity

use kernel::id::ThemeId;

use crate::domain::validation::ValidationErrors;

pub const TITLE_MIN: usize = 1;
pub const TITLE_MAX: usize = 40;

/// Stored theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub id: ThemeId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDraft {
    pub title: String,
}

impl ThemeDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_length("title", &self.title, TITLE_MIN, TITLE_MAX);
        errors.into_result()
    }
}
