use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A required, non-empty text field and the reason reported when it is missing.
#[derive(Debug, Clone, Copy)]
pub struct RequiredText {
    pub field: &'static str,
    pub message: &'static str,
}

pub const TITLE: RequiredText = RequiredText {
    field: "title",
    message: "Please enter todo title.",
};

pub const DESCRIPTION: RequiredText = RequiredText {
    field: "description",
    message: "Please enter todo description.",
};

pub const TODO_RULES: [RequiredText; 2] = [TITLE, DESCRIPTION];

/// Field name -> human readable reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.insert(field.into(), reason.into());
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, reason) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field, reason)?;
            first = false;
        }
        Ok(())
    }
}

impl RequiredText {
    pub fn check(&self, value: Option<&str>, errors: &mut FieldErrors) {
        // whitespace-only text counts as present
        if value.is_none_or(str::is_empty) {
            errors.insert(self.field, self.message);
        }
    }
}

/// Checks a full todo candidate. `None` means the field is absent.
pub fn validate_todo(title: Option<&str>, description: Option<&str>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for (rule, value) in TODO_RULES.iter().zip([title, description]) {
        rule.check(value, &mut errors);
    }
    errors.into_result()
}

/// Checks only the fields a partial update carries.
pub fn validate_patch(title: Option<&str>, description: Option<&str>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for (rule, value) in TODO_RULES.iter().zip([title, description]) {
        if value.is_some() {
            rule.check(value, &mut errors);
        }
    }
    errors.into_result()
}
