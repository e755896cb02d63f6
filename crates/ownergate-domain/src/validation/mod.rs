//! Form validation for comments, notes and account sign-up.
//!
//! Each form deserializes leniently (missing fields become empty strings)
//! so that a structurally valid request with bad content produces field
//! errors rather than a parse failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::UserId;
use crate::slug::{is_valid_slug, slugify, SLUG_MAX_LEN};

/// Words a comment may not contain.
pub const BAD_WORDS: [&str; 2] = ["редиска", "негодяй"];

/// Field error for a comment containing a bad word.
pub const WARNING: &str = "Не ругайтесь!";

/// Suffix of the field error for a slug that is already taken.
pub const SLUG_TAKEN_WARNING: &str =
    " - такой slug уже существует, придумайте уникальное значение!";

pub const REQUIRED: &str = "Обязательное поле.";

/// Maximum note title length, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum username length, in characters.
pub const USERNAME_MAX_LEN: usize = 150;

/// Field name to error messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates errors holding a single message for `field`.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Returns the field error for a slug that another note already uses.
pub fn slug_taken_message(slug: &str) -> String {
    format!("{slug}{SLUG_TAKEN_WARNING}")
}

fn too_long_message(max: usize) -> String {
    format!("Убедитесь, что это значение содержит не более {max} символов.")
}

/// Submitted comment text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Field names rendered by a comment form.
    pub const FIELDS: &'static [&'static str] = &["text"];

    /// Validates the form and returns the text to store.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        let text = self.text.trim();

        if text.is_empty() {
            errors.add("text", REQUIRED);
        } else {
            let lowered = text.to_lowercase();
            if BAD_WORDS.iter().any(|word| lowered.contains(word)) {
                errors.add("text", WARNING);
            }
        }

        errors.into_result(text.to_string())
    }
}

/// Submitted note fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A note that passed validation and is ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteForm {
    /// Field names rendered by a note form.
    pub const FIELDS: &'static [&'static str] = &["title", "text", "slug"];

    /// Validates the form.
    ///
    /// A blank slug is generated from the title. Slug uniqueness is a
    /// storage concern and is not checked here.
    pub fn validate(&self) -> Result<NoteDraft, FormErrors> {
        let mut errors = FormErrors::new();
        let title = self.title.trim();
        let text = self.text.trim();
        let slug = self.slug.as_deref().map(str::trim).unwrap_or_default();

        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > TITLE_MAX_LEN {
            errors.add("title", too_long_message(TITLE_MAX_LEN));
        }

        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let slug = if slug.is_empty() {
            let generated = slugify(title);
            if generated.is_empty() && !title.is_empty() {
                errors.add("slug", "Не удалось сформировать slug из заголовка.");
            }
            generated
        } else if slug.chars().count() > SLUG_MAX_LEN {
            errors.add("slug", too_long_message(SLUG_MAX_LEN));
            slug.to_string()
        } else if !is_valid_slug(slug) {
            errors.add(
                "slug",
                "Значение должно состоять из латинских букв, цифр, знаков подчеркивания или дефиса.",
            );
            slug.to_string()
        } else {
            slug.to_string()
        };

        errors.into_result(NoteDraft {
            title: title.to_string(),
            text: text.to_string(),
            slug,
        })
    }
}

/// Submitted sign-up fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
}

impl SignupForm {
    /// Validates the username: letters, digits and `@.+-_` only.
    pub fn validate(&self) -> Result<UserId, FormErrors> {
        let username = self.username.trim();

        let message = if username.is_empty() {
            Some(REQUIRED.to_string())
        } else if username.chars().count() > USERNAME_MAX_LEN {
            Some(too_long_message(USERNAME_MAX_LEN))
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            Some("Введите правильное имя пользователя.".to_string())
        } else {
            None
        };

        match message {
            Some(message) => Err(FormErrors::single("username", message)),
            None => UserId::new(username)
                .map_err(|e| FormErrors::single("username", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_with_bad_word_is_rejected() {
        let form = CommentForm::new(format!("Какой-то текст, {}, еще текст", BAD_WORDS[0]));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("text"), [WARNING.to_string()]);
    }

    #[test]
    fn test_bad_word_check_ignores_case() {
        let form = CommentForm::new("Ты НЕГОДЯЙ");
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_clean_comment_is_accepted_and_trimmed() {
        let form = CommentForm::new("  Новый текст ");
        assert_eq!(form.validate().unwrap(), "Новый текст");
    }

    #[test]
    fn test_empty_comment_is_required() {
        let errors = CommentForm::default().validate().unwrap_err();
        assert_eq!(errors.field("text"), [REQUIRED.to_string()]);
    }

    #[test]
    fn test_note_form_keeps_explicit_slug() {
        let form = NoteForm {
            title: "Новый заголовок".to_string(),
            text: "Новый текст".to_string(),
            slug: Some("new-slug".to_string()),
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.slug, "new-slug");
        assert_eq!(draft.title, "Новый заголовок");
    }

    #[test]
    fn test_note_form_generates_slug_from_title() {
        let form = NoteForm {
            title: "Новый заголовок".to_string(),
            text: "Новый текст".to_string(),
            slug: None,
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.slug, slugify("Новый заголовок"));

        let blank = NoteForm {
            slug: Some("   ".to_string()),
            ..form
        };
        assert_eq!(blank.validate().unwrap().slug, draft.slug);
    }

    #[test]
    fn test_note_form_reports_every_bad_field() {
        let form = NoteForm {
            title: "x".repeat(TITLE_MAX_LEN + 1),
            text: String::new(),
            slug: Some("Not A Slug".to_string()),
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, ["slug", "text", "title"]);
    }

    #[test]
    fn test_note_form_with_unsluggable_title() {
        let form = NoteForm {
            title: "!!!".to_string(),
            text: "text".to_string(),
            slug: None,
        };
        assert!(!form.validate().unwrap_err().field("slug").is_empty());
    }

    #[test]
    fn test_slug_taken_message() {
        assert_eq!(
            slug_taken_message("zagolovok"),
            "zagolovok - такой slug уже существует, придумайте уникальное значение!"
        );
    }

    #[test]
    fn test_signup_form() {
        let ok = SignupForm {
            username: "author".to_string(),
        };
        assert_eq!(ok.validate().unwrap().as_str(), "author");

        for bad in ["", "has space", "u".repeat(USERNAME_MAX_LEN + 1).as_str()] {
            let form = SignupForm {
                username: bad.to_string(),
            };
            assert!(form.validate().is_err(), "should reject {bad:?}");
        }
    }

    #[test]
    fn test_form_errors_serialize_as_map() {
        let errors = FormErrors::single("text", WARNING);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"text": [WARNING]}));
    }
}
