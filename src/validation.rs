//! Field validators for project input.
//!
//! Each rule records a message against the field it checks instead of
//! returning early, so a single response can report every problem at once.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::UploadedFile;

pub const TITLE_MAX_CHARS: usize = 255;
pub const IMAGE_MAX_KILOBYTES: usize = 2048;
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpeg", "png", "jpg", "gif"];

/// Field name -> messages, in the order the rules ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
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

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First message plus a count of the rest, e.g. for a log line or summary
    pub fn summary(&self) -> String {
        let total: usize = self.0.values().map(Vec::len).sum();
        let first = self
            .0
            .values()
            .flat_map(|messages| messages.iter())
            .next()
            .cloned()
            .unwrap_or_default();

        match total {
            0 | 1 => first,
            2 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n - 1),
        }
    }

    /// `Ok(())` when no rule failed, otherwise a 422-mapped error
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

/// Trim surrounding whitespace; a blank string counts as absent.
pub fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// `string` rule over a raw JSON body: every listed key that is present must
/// hold a string or `null`. A body that is not an object fails as a whole.
pub fn string_fields(errors: &mut ValidationErrors, body: &Value, fields: &[&str]) {
    let Some(object) = body.as_object() else {
        errors.add("body", "The request body must be a JSON object.");
        return;
    };

    for field in fields {
        match object.get(*field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => errors.add(field, format!("The {} field must be a string.", field)),
        }
    }
}

/// Records a `required` failure when `value` is absent. Returns the value for chaining.
pub fn required<'a>(errors: &mut ValidationErrors, field: &str, value: Option<&'a str>) -> Option<&'a str> {
    if value.is_none() {
        errors.add(field, format!("The {} field is required.", field));
    }
    value
}

/// Length in characters, not bytes
pub fn max_chars(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("The {} field must not be greater than {} characters.", field, max),
        );
    }
}

/// Absolute URL with a host, e.g. `https://example.com/path`
pub fn url(errors: &mut ValidationErrors, field: &str, value: &str) {
    let valid = url::Url::parse(value)
        .map(|parsed| parsed.has_host() && !parsed.cannot_be_a_base())
        .unwrap_or(false);

    if !valid {
        errors.add(field, format!("The {} field must be a valid URL.", field));
    }
}

/// Image upload: an image content type, an allowed extension, and at most 2048 KB.
/// The bytes themselves are not inspected.
pub fn image_upload(errors: &mut ValidationErrors, field: &str, file: &UploadedFile) {
    let declared_image = file
        .content_type
        .as_deref()
        .map(|ct| ct.to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(true);

    if file.client_name().is_empty() || !declared_image {
        errors.add(field, format!("The {} field must be an image.", field));
    }

    let extension = file.extension().unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        errors.add(
            field,
            format!(
                "The {} field must be a file of type: {}.",
                field,
                IMAGE_EXTENSIONS.join(", ")
            ),
        );
    }

    if file.size() > IMAGE_MAX_KILOBYTES * 1024 {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {} kilobytes.",
                field, IMAGE_MAX_KILOBYTES
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("".to_string())), None);
        assert_eq!(normalize(Some("   ".to_string())), None);
        assert_eq!(normalize(Some("  hi ".to_string())), Some("hi".to_string()));
        assert_eq!(normalize(Some("hi".to_string())), Some("hi".to_string()));
    }

    #[test]
    fn test_required() {
        let mut errors = ValidationErrors::new();
        assert_eq!(required(&mut errors, "title", Some("x")), Some("x"));
        assert!(errors.is_empty());

        assert_eq!(required(&mut errors, "title", None), None);
        assert_eq!(
            errors.get("title").unwrap(),
            ["The title field is required.".to_string()]
        );
    }

    #[test]
    fn test_max_chars_counts_characters() {
        let mut errors = ValidationErrors::new();
        max_chars(&mut errors, "title", &"é".repeat(255), TITLE_MAX_CHARS);
        assert!(errors.is_empty());

        max_chars(&mut errors, "title", &"a".repeat(256), TITLE_MAX_CHARS);
        assert_eq!(
            errors.get("title").unwrap(),
            ["The title field must not be greater than 255 characters.".to_string()]
        );
    }

    #[test]
    fn test_url() {
        let mut errors = ValidationErrors::new();
        url(&mut errors, "link", "https://example.com");
        url(&mut errors, "link", "http://localhost:8080/a?b=c");
        assert!(errors.is_empty());

        for bad in ["example.com", "not a url", "mailto:someone@example.com", "https://"] {
            let mut errors = ValidationErrors::new();
            url(&mut errors, "link", bad);
            assert!(errors.has("link"), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn test_string_fields() {
        let body = serde_json::json!({
            "title": 123,
            "description": null,
            "link": "https://example.com",
            "image": ["a.png"],
            "user_id": 5
        });

        let mut errors = ValidationErrors::new();
        string_fields(&mut errors, &body, &["title", "description", "image", "link"]);

        assert_eq!(errors.get("title").unwrap(), ["The title field must be a string."]);
        assert_eq!(errors.get("image").unwrap(), ["The image field must be a string."]);
        assert!(!errors.has("description"));
        assert!(!errors.has("link"));
        assert!(!errors.has("user_id"));
    }

    #[test]
    fn test_string_fields_requires_object() {
        let mut errors = ValidationErrors::new();
        string_fields(&mut errors, &serde_json::json!(["title"]), &["title"]);
        assert!(errors.has("body"));
        assert!(!errors.has("title"));
    }

    #[test]
    fn test_image_upload_accepts_allowed_types() {
        for name in ["a.jpeg", "a.png", "a.jpg", "a.gif", "A.PNG"] {
            let mut errors = ValidationErrors::new();
            image_upload(&mut errors, "image", &png(name, 10));
            assert!(errors.is_empty(), "expected {name:?} to be accepted");
        }
    }

    #[test]
    fn test_image_upload_rejects_extension() {
        let mut errors = ValidationErrors::new();
        image_upload(&mut errors, "image", &png("diagram.svg", 10));
        assert_eq!(
            errors.get("image").unwrap(),
            ["The image field must be a file of type: jpeg, png, jpg, gif.".to_string()]
        );
    }

    #[test]
    fn test_image_upload_size_boundary() {
        let mut errors = ValidationErrors::new();
        image_upload(&mut errors, "image", &png("a.png", 2048 * 1024));
        assert!(errors.is_empty());

        image_upload(&mut errors, "image", &png("a.png", 2048 * 1024 + 1));
        assert_eq!(
            errors.get("image").unwrap(),
            ["The image field must not be greater than 2048 kilobytes.".to_string()]
        );
    }

    #[test]
    fn test_image_upload_rejects_non_image_content_type() {
        let mut errors = ValidationErrors::new();
        let file = UploadedFile {
            file_name: "a.png".to_string(),
            content_type: Some("application/pdf".to_string()),
            data: vec![1, 2, 3],
        };
        image_upload(&mut errors, "image", &file);
        assert_eq!(
            errors.get("image").unwrap(),
            ["The image field must be an image.".to_string()]
        );
    }

    #[test]
    fn test_summary() {
        let mut errors = ValidationErrors::new();
        assert_eq!(errors.summary(), "");

        errors.add("title", "The title field is required.");
        assert_eq!(errors.summary(), "The title field is required.");

        errors.add("link", "The link field must be a valid URL.");
        assert_eq!(
            errors.summary(),
            "The link field must be a valid URL. (and 1 more error)"
        );
    }
}
