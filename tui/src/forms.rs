//! Form Input Model
//!
//! A minimal focused-field text form used by the auth, booking, and
//! passcode inputs. One field has focus; characters go to it, Tab moves
//! focus, and the whole form can be drained into an owned value set.

/// One labelled text field
#[derive(Clone, Debug)]
pub struct TextField {
    /// Field label shown to the user
    pub label: &'static str,
    /// Current value
    pub value: String,
    /// Mask input (passwords)
    pub masked: bool,
}

impl TextField {
    /// Create an empty field
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    /// Create an empty masked field
    #[must_use]
    pub fn masked(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: true,
        }
    }

    /// The value as rendered (masked fields show dots)
    #[must_use]
    pub fn rendered(&self) -> String {
        if self.masked {
            "\u{2022}".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// A vertical stack of text fields with one focused
#[derive(Clone, Debug, Default)]
pub struct FormState {
    fields: Vec<TextField>,
    focused: usize,
}

impl FormState {
    /// Create a form from fields; the first has focus
    #[must_use]
    pub fn new(fields: Vec<TextField>) -> Self {
        Self { fields, focused: 0 }
    }

    /// All fields, in order
    #[must_use]
    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    /// Index of the focused field
    #[must_use]
    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Whether the form has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Move focus to the next field, wrapping
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    /// Move focus to the previous field, wrapping
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = if self.focused == 0 {
                self.fields.len() - 1
            } else {
                self.focused - 1
            };
        }
    }

    /// Type a character into the focused field
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// The value of a field by label, or empty when absent
    #[must_use]
    pub fn value(&self, label: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    /// Clear every field and refocus the first
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focused = 0;
    }
}
