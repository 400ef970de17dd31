//! Request-body validation for book payloads.
//!
//! The schema is a fixed field table checked before anything touches the
//! repository: a body that fails here never reaches the storage layer.
//! Unknown extra keys are ignored; they are discarded at decode.

use once_cell::sync::Lazy;
use serde_json::Value;
use url::Url;

use super::models::Book;
use libris_http::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    String,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldFormat {
    Uri,
}

struct FieldSpec {
    field_type: FieldType,
    required: bool,
    format: Option<FieldFormat>,
}

const fn string_field() -> FieldSpec {
    FieldSpec {
        field_type: FieldType::String,
        required: true,
        format: None,
    }
}

const fn integer_field() -> FieldSpec {
    FieldSpec {
        field_type: FieldType::Integer,
        required: true,
        format: None,
    }
}

static BOOK_SCHEMA: Lazy<Vec<(&'static str, FieldSpec)>> = Lazy::new(|| {
    vec![
        ("isbn", string_field()),
        (
            "amazon_url",
            FieldSpec {
                field_type: FieldType::String,
                required: true,
                format: Some(FieldFormat::Uri),
            },
        ),
        ("author", string_field()),
        ("language", string_field()),
        ("pages", integer_field()),
        ("publisher", string_field()),
        ("title", string_field()),
        ("year", integer_field()),
    ]
});

/// Check a payload against the book schema. Returns one human-readable
/// message per violated constraint; an empty list means the payload is valid.
pub fn validate(payload: &Value) -> Vec<String> {
    let Some(object) = payload.as_object() else {
        return vec!["request body must be a JSON object".to_string()];
    };

    let mut violations = Vec::new();

    for (name, spec) in BOOK_SCHEMA.iter() {
        let value = match object.get(*name) {
            None | Some(Value::Null) => {
                if spec.required {
                    violations.push(format!("{name} is required"));
                }
                continue;
            }
            Some(value) => value,
        };

        match spec.field_type {
            FieldType::String => {
                let Some(text) = value.as_str() else {
                    violations.push(format!("{name} must be a string"));
                    continue;
                };

                if spec.format == Some(FieldFormat::Uri) && Url::parse(text).is_err() {
                    violations.push(format!("{name} must be a valid URL"));
                }
            }
            FieldType::Integer => {
                if value.as_i64().is_none() {
                    violations.push(format!("{name} must be an integer"));
                }
            }
        }
    }

    violations
}

/// Validate a payload and decode it into a [`Book`]. Validation failures
/// surface as a 400 carrying every violation message.
pub fn decode(payload: Value) -> Result<Book, AppError> {
    let violations = validate(&payload);
    if !violations.is_empty() {
        return Err(AppError::validation(violations));
    }

    serde_json::from_value(payload).map_err(|err| AppError::validation(vec![err.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "isbn": "0439064866",
            "amazon_url": "https://a.co/d/0iYWYn4",
            "author": "J.K. Rowling",
            "language": "english",
            "pages": 352,
            "publisher": "Scholastic Press",
            "title": "Harry Potter and the Chamber of Secrets",
            "year": 1999
        })
    }

    #[test]
    fn valid_payload_has_no_violations() {
        assert!(validate(&valid_payload()).is_empty());
    }

    #[test]
    fn numeric_isbn_is_rejected() {
        let mut payload = valid_payload();
        payload["isbn"] = json!(439064866);

        assert_eq!(validate(&payload), vec!["isbn must be a string"]);
    }

    #[test]
    fn stringified_pages_are_rejected() {
        let mut payload = valid_payload();
        payload["pages"] = json!("352");

        assert_eq!(validate(&payload), vec!["pages must be an integer"]);
    }

    #[test]
    fn fractional_year_is_rejected() {
        let mut payload = valid_payload();
        payload["year"] = json!(1999.5);

        assert_eq!(validate(&payload), vec!["year must be an integer"]);
    }

    #[test]
    fn missing_required_field_is_reported() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("author");

        assert_eq!(validate(&payload), vec!["author is required"]);
    }

    #[test]
    fn null_counts_as_missing() {
        let mut payload = valid_payload();
        payload["publisher"] = Value::Null;

        assert_eq!(validate(&payload), vec!["publisher is required"]);
    }

    #[test]
    fn schemeless_url_is_rejected() {
        let mut payload = valid_payload();
        payload["amazon_url"] = json!("a.co/d/0iYWYn4");

        assert_eq!(validate(&payload), vec!["amazon_url must be a valid URL"]);
    }

    #[test]
    fn all_violations_are_collected() {
        let payload = json!({
            "isbn": 439064866,
            "amazon_url": "a.co/d/0iYWYn4",
            "language": "english",
            "pages": "352",
            "publisher": "Scholastic Press",
            "title": "Harry Potter and the Chamber of Secrets",
            "year": 1999
        });

        let violations = validate(&payload);
        assert_eq!(
            violations,
            vec![
                "isbn must be a string",
                "amazon_url must be a valid URL",
                "author is required",
                "pages must be an integer",
            ]
        );
    }

    #[test]
    fn non_object_body_is_rejected_outright() {
        assert_eq!(
            validate(&json!(["not", "an", "object"])),
            vec!["request body must be a JSON object"]
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut payload = valid_payload();
        payload["shelf"] = json!("A3");

        assert!(validate(&payload).is_empty());
        let book = decode(payload).unwrap();
        assert_eq!(book.isbn, "0439064866");
    }
}
