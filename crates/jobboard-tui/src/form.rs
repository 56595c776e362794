//! Text-entry forms shared by the login, signup, job, profile and apply views.
//!
//! A form is a list of single-line fields followed by a row of buttons. Focus
//! walks the fields first, then the buttons.

use crossterm::event::{KeyCode, KeyEvent};

/// Maximum length for short inputs such as usernames.
pub const MAX_SHORT_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for free-text inputs such as descriptions.
pub const MAX_TEXT_LENGTH: usize = 2000;

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
    max_len: usize,
}

impl FormField {
    pub fn text(label: &'static str, max_len: usize) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
            max_len,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: true,
            max_len: MAX_PASSWORD_LENGTH,
        }
    }

    /// The value as it should appear on screen.
    pub fn display_value(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// What a key press asked the form's owner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    /// A button was activated, by index.
    Button(usize),
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub buttons: Vec<&'static str>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>, buttons: Vec<&'static str>) -> Self {
        Self {
            fields,
            buttons,
            focus: 0,
        }
    }

    fn slots(&self) -> usize {
        self.fields.len() + self.buttons.len()
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, index: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.chars().take(field.max_len).collect();
        }
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }

    pub fn focused_field(&self) -> Option<usize> {
        (self.focus < self.fields.len()).then_some(self.focus)
    }

    pub fn focused_button(&self) -> Option<usize> {
        self.focus
            .checked_sub(self.fields.len())
            .filter(|i| *i < self.buttons.len())
    }

    pub fn focus_field(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = (self.focus + 1) % self.slots();
    }

    pub fn prev_focus(&mut self) {
        self.focus = (self.focus + self.slots() - 1) % self.slots();
    }

    pub fn push_char(&mut self, c: char) -> bool {
        let Some(index) = self.focused_field() else {
            return false;
        };
        let field = &mut self.fields[index];
        if can_add_char(field.value.chars().count(), field.max_len, c) {
            field.value.push(c);
            true
        } else {
            false
        }
    }

    pub fn backspace(&mut self) {
        if let Some(index) = self.focused_field() {
            self.fields[index].value.pop();
        }
    }

    /// Apply a key press. Enter on the last field activates the first button.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.next_focus();
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev_focus();
                FormAction::None
            }
            KeyCode::Left if self.focused_button().is_some() => {
                self.prev_focus();
                FormAction::None
            }
            KeyCode::Right if self.focused_button().is_some() => {
                self.next_focus();
                FormAction::None
            }
            KeyCode::Enter => {
                if let Some(button) = self.focused_button() {
                    FormAction::Button(button)
                } else if self.focus + 1 == self.fields.len() && !self.buttons.is_empty() {
                    FormAction::Button(0)
                } else {
                    self.next_focus();
                    FormAction::None
                }
            }
            KeyCode::Backspace => {
                self.backspace();
                FormAction::None
            }
            KeyCode::Char(c) => {
                self.push_char(c);
                FormAction::None
            }
            _ => FormAction::None,
        }
    }
}

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a field of the given limit
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn login_form() -> Form {
        Form::new(
            vec![
                FormField::text("Username", MAX_SHORT_LENGTH),
                FormField::masked("Password"),
            ],
            vec!["Sign in", "Sign Up"],
        )
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(0, MAX_SHORT_LENGTH, 'a'));
        assert!(can_add_char(49, MAX_SHORT_LENGTH, 'z'));
        assert!(!can_add_char(50, MAX_SHORT_LENGTH, 'a'));
        assert!(can_add_char(127, MAX_PASSWORD_LENGTH, '!'));
        assert!(!can_add_char(128, MAX_PASSWORD_LENGTH, 'a'));
        assert!(!can_add_char(0, MAX_SHORT_LENGTH, '\x00'));
        assert!(!can_add_char(0, MAX_SHORT_LENGTH, '\n'));
        assert!(!can_add_char(0, MAX_SHORT_LENGTH, '\t'));
    }

    #[test]
    fn test_typing_and_masking() {
        let mut form = login_form();
        for c in "alice".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Tab));
        for c in "pw!".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Backspace));

        assert_eq!(form.value(0), "alice");
        assert_eq!(form.value(1), "pw");
        assert_eq!(form.fields[1].display_value(), "**");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = login_form();
        form.prev_focus();
        assert_eq!(form.focused_button(), Some(1));
        form.next_focus();
        assert_eq!(form.focused_field(), Some(0));
    }

    #[test]
    fn test_enter_on_last_field_submits() {
        let mut form = login_form();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::None);
        assert_eq!(form.focused_field(), Some(1));
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Button(0));
    }

    #[test]
    fn test_enter_on_button() {
        let mut form = login_form();
        form.focus = 3;
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Button(1));
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }

    #[test]
    fn test_typing_on_button_is_ignored() {
        let mut form = login_form();
        form.focus = 2;
        assert!(!form.push_char('x'));
        assert_eq!(form.value(0), "");
    }

    #[test]
    fn test_set_value_respects_limit() {
        let mut form = login_form();
        form.set_value(0, &"a".repeat(80));
        assert_eq!(form.value(0).len(), MAX_SHORT_LENGTH);
    }
}
