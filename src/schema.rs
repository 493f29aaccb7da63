use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;

/// A fully validated catalog entry. Every field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub published_date: String,
    pub cover_art: String,
    pub download_link: String,
    pub read_online_link: String,
    pub language: String,
    pub updated_date: String,
}

/// Fields as scraped, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCandidate {
    pub id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub cover_art: Option<String>,
    pub download_link: Option<String>,
    pub read_online_link: Option<String>,
    pub language: Option<String>,
    pub updated_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn required(path: String) -> Self {
        Self {
            path,
            message: "Required".to_owned(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Aggregated schema failures; never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|err| err.path.as_str())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

const FIELD_NAMES: [&str; 9] = [
    "id",
    "title",
    "author",
    "publishedDate",
    "coverArt",
    "downloadLink",
    "readOnlineLink",
    "language",
    "updatedDate",
];

impl BookCandidate {
    pub fn validate(self) -> Result<BookRecord, FieldErrors> {
        let mut errors = Vec::new();
        let mut take = |name: &str, value: Option<String>| {
            value.unwrap_or_else(|| {
                errors.push(FieldError::required(name.to_owned()));
                String::new()
            })
        };

        let book = BookRecord {
            id: take(FIELD_NAMES[0], self.id),
            title: take(FIELD_NAMES[1], self.title),
            author: take(FIELD_NAMES[2], self.author),
            published_date: take(FIELD_NAMES[3], self.published_date),
            cover_art: take(FIELD_NAMES[4], self.cover_art),
            download_link: take(FIELD_NAMES[5], self.download_link),
            read_online_link: take(FIELD_NAMES[6], self.read_online_link),
            language: take(FIELD_NAMES[7], self.language),
            updated_date: take(FIELD_NAMES[8], self.updated_date),
        };

        if errors.is_empty() {
            Ok(book)
        } else {
            Err(FieldErrors(errors))
        }
    }
}

/// Validates one stored record. `path` prefixes every reported field.
pub fn validate_book(value: &Value, path: &str) -> Result<BookRecord, FieldErrors> {
    let Some(object) = value.as_object() else {
        return Err(FieldErrors(vec![FieldError {
            path: path.to_owned(),
            message: type_mismatch("object", value),
        }]));
    };

    let mut errors = Vec::new();
    let mut take = |name: &str| {
        let field_path = join_path(path, name);
        match object.get(name) {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => {
                errors.push(FieldError::required(field_path));
                String::new()
            }
            Some(other) => {
                errors.push(FieldError {
                    path: field_path,
                    message: type_mismatch("string", other),
                });
                String::new()
            }
        }
    };

    let book = BookRecord {
        id: take(FIELD_NAMES[0]),
        title: take(FIELD_NAMES[1]),
        author: take(FIELD_NAMES[2]),
        published_date: take(FIELD_NAMES[3]),
        cover_art: take(FIELD_NAMES[4]),
        download_link: take(FIELD_NAMES[5]),
        read_online_link: take(FIELD_NAMES[6]),
        language: take(FIELD_NAMES[7]),
        updated_date: take(FIELD_NAMES[8]),
    };

    if errors.is_empty() {
        Ok(book)
    } else {
        Err(FieldErrors(errors))
    }
}

/// Validates a stored collection blob. Either every record passes or none
/// are returned.
pub fn validate_collection(value: &Value) -> Result<Collection, FieldErrors> {
    let Some(object) = value.as_object() else {
        return Err(FieldErrors(vec![FieldError {
            path: String::new(),
            message: type_mismatch("object", value),
        }]));
    };

    let mut collection = Collection::default();
    let mut errors = Vec::new();
    for (key, entry) in object {
        match validate_book(entry, key) {
            Ok(book) => collection.insert_keyed(key.clone(), book),
            Err(FieldErrors(mut errs)) => errors.append(&mut errs),
        }
    }

    if errors.is_empty() {
        Ok(collection)
    } else {
        Err(FieldErrors(errors))
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

fn type_mismatch(expected: &str, actual: &Value) -> String {
    let received = match actual {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("Expected {expected}, received {received}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_candidate() -> BookCandidate {
        BookCandidate {
            id: Some("1342".to_owned()),
            title: Some("Pride and Prejudice".to_owned()),
            author: Some("Austen, Jane".to_owned()),
            published_date: Some("Jun 1, 1998".to_owned()),
            cover_art: Some("/cache/epub/1342/pg1342.cover.medium.jpg".to_owned()),
            download_link: Some("/ebooks/1342.html.images".to_owned()),
            read_online_link: Some("/ebooks/1342.html.images".to_owned()),
            language: Some("English".to_owned()),
            updated_date: Some("Oct 1, 2024".to_owned()),
        }
    }

    #[test]
    fn validate_keeps_every_field_unchanged() {
        let book = full_candidate().validate().unwrap();
        assert_eq!(book.id, "1342");
        assert_eq!(book.title, "Pride and Prejudice");
        assert_eq!(book.author, "Austen, Jane");
        assert_eq!(book.language, "English");
        assert_eq!(book.updated_date, "Oct 1, 2024");
    }

    #[test]
    fn validate_reports_all_missing_fields_in_order() {
        let candidate = BookCandidate {
            author: None,
            cover_art: None,
            ..full_candidate()
        };
        let err = candidate.validate().unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["author", "coverArt"]);
        assert_eq!(err.to_string(), "author: Required; coverArt: Required");
    }

    #[test]
    fn empty_strings_pass_type_check() {
        let candidate = BookCandidate {
            language: Some(String::new()),
            ..full_candidate()
        };
        assert_eq!(candidate.validate().unwrap().language, "");
    }

    #[test]
    fn record_serializes_with_camel_case_names() {
        let book = full_candidate().validate().unwrap();
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["publishedDate"], "Jun 1, 1998");
        assert_eq!(value["readOnlineLink"], "/ebooks/1342.html.images");
        assert!(value.get("published_date").is_none());
    }

    #[test]
    fn validate_book_reports_type_mismatches() {
        let mut value = serde_json::to_value(full_candidate().validate().unwrap()).unwrap();
        value["title"] = json!(42);
        value.as_object_mut().unwrap().remove("author");

        let err = validate_book(&value, "1342").unwrap_err();
        assert_eq!(
            err.to_string(),
            "1342.title: Expected string, received number; 1342.author: Required"
        );
    }

    #[test]
    fn validate_book_strips_unknown_keys() {
        let mut value = serde_json::to_value(full_candidate().validate().unwrap()).unwrap();
        value["rating"] = json!(5);
        let book = validate_book(&value, "").unwrap();
        assert_eq!(book, full_candidate().validate().unwrap());
    }

    #[test]
    fn validate_collection_rejects_non_objects() {
        let err = validate_collection(&json!([])).unwrap_err();
        assert_eq!(err.to_string(), "Expected object, received array");
    }

    #[test]
    fn validate_collection_is_all_or_nothing() {
        let good = serde_json::to_value(full_candidate().validate().unwrap()).unwrap();
        let mut bad = good.clone();
        bad["id"] = json!("84");
        bad.as_object_mut().unwrap().remove("author");

        let blob = json!({ "1342": good, "84": bad });
        let err = validate_collection(&blob).unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["84.author"]);
    }
}
