//! Field Validation
//!
//! Validators report every violated field, not just the first. Lengths are
//! counted in Unicode scalar values.

use std::borrow::Cow;
use std::fmt;

use kernel::error::app_error::Violation;

/// Aggregated field violations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<Cow<'static, str>>, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }

    /// Required field with a length window
    ///
    /// An empty value reports only "cannot be blank".
    pub fn check_length(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len == 0 {
            self.push(field, "cannot be blank");
        } else if len < min || len > max {
            self.push(
                field,
                format!("the length must be between {} and {}", min, max),
            );
        }
    }

    /// Required field with only a lower bound
    pub fn check_min_length(&mut self, field: &'static str, value: &str, min: usize) {
        let len = value.chars().count();
        if len == 0 {
            self.push(field, "cannot be blank");
        } else if len < min {
            self.push(field, format!("the length must be no less than {}", min));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// `Ok` when nothing was violated
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Email grammar
// ============================================================================

const LOCAL_PART_MAX: usize = 64;
const LABEL_MAX: usize = 63;

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= LABEL_MAX
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

/// Address syntax check
///
/// Exactly one `@`; a dot-atom local part of at most 64 characters; a domain
/// of at least two labels, each 1-63 alphanumerics or hyphens with no
/// leading or trailing hyphen.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    let local_ok = !local.is_empty()
        && local.len() <= LOCAL_PART_MAX
        && local.chars().all(is_local_char)
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..");
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| is_valid_label(label))
}
