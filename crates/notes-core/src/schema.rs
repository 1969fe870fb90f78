//! Note Schema
//!
//! The single place where note text and labels are checked. User input and
//! rows coming back from the remote table both pass through here, so the
//! local collection only ever holds notes that satisfy the invariants.

use chrono::{DateTime, Utc};

use crate::domain::{Note, NoteInput, NoteRow, ValidNote, ValidationError};

/// Longest allowed note body, in characters after trimming
pub const MAX_TEXT_CHARS: usize = 1000;
/// Longest allowed label, in characters after trimming
pub const MAX_LABEL_CHARS: usize = 50;

/// Trim and check user input. The first failing rule is reported.
///
/// A label that is blank after trimming is treated as no label.
pub fn validate_input(input: &NoteInput) -> Result<ValidNote, ValidationError> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(ValidationError::TextRequired);
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(ValidationError::TextTooLong);
    }

    let label = normalize_label(input.label.as_deref());
    if let Some(label) = &label {
        if label.chars().count() > MAX_LABEL_CHARS {
            return Err(ValidationError::LabelTooLong);
        }
    }

    Ok(ValidNote {
        text: text.to_string(),
        label,
    })
}

/// Validate a row from the remote table into a [`Note`].
pub fn validate_row(row: NoteRow) -> Result<Note, ValidationError> {
    let valid = validate_input(&NoteInput {
        text: row.text,
        label: row.label,
    })?;

    let id = parse_uuid("id", &row.id)?;
    let user_id = parse_uuid("user_id", &row.user_id)?;
    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map_err(|e| ValidationError::MalformedRow(format!("created_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(Note {
        id,
        user_id,
        text: valid.text,
        label: valid.label,
        created_at,
    })
}

/// Validate a whole fetch. One bad row fails the batch.
pub fn validate_rows(rows: Vec<NoteRow>) -> Result<Vec<Note>, ValidationError> {
    rows.into_iter().map(validate_row).collect()
}

fn normalize_label(label: Option<&str>) -> Option<String> {
    label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

fn parse_uuid(field: &str, value: &str) -> Result<String, ValidationError> {
    uuid::Uuid::parse_str(value)
        .map(|_| value.to_string())
        .map_err(|_| ValidationError::MalformedRow(format!("{} is not a UUID: {:?}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: &str, label: Option<&str>) -> NoteRow {
        NoteRow {
            id: "6f1c1a52-7a0e-4a39-9d0b-0c7f4b8a9e11".to_string(),
            user_id: "2b0e4a7c-1111-4c22-8e33-444455556666".to_string(),
            text: text.to_string(),
            label: label.map(str::to_string),
            created_at: "2024-05-01T12:30:00.123456+00:00".to_string(),
        }
    }

    #[test]
    fn test_input_is_trimmed() {
        let valid = validate_input(&NoteInput::new("  Buy milk \n", Some(" errands "))).unwrap();
        assert_eq!(valid.text, "Buy milk");
        assert_eq!(valid.label.as_deref(), Some("errands"));
    }

    #[test]
    fn test_blank_text_rejected() {
        assert_eq!(
            validate_input(&NoteInput::new("", None)),
            Err(ValidationError::TextRequired)
        );
        assert_eq!(
            validate_input(&NoteInput::new(" \t\n ", Some("x"))),
            Err(ValidationError::TextRequired)
        );
    }

    #[test]
    fn test_text_length_boundary() {
        let max = "a".repeat(MAX_TEXT_CHARS);
        assert!(validate_input(&NoteInput::new(max, None)).is_ok());

        let over = "a".repeat(MAX_TEXT_CHARS + 1);
        let err = validate_input(&NoteInput::new(over, None)).unwrap_err();
        assert_eq!(err, ValidationError::TextTooLong);
        assert_eq!(err.to_string(), "Note is too long");
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let text = "é".repeat(MAX_TEXT_CHARS);
        assert!(validate_input(&NoteInput::new(text, None)).is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_does_not_count() {
        let text = format!("  {}  ", "a".repeat(MAX_TEXT_CHARS));
        assert!(validate_input(&NoteInput::new(text, None)).is_ok());
    }

    #[test]
    fn test_label_rules() {
        let blank = validate_input(&NoteInput::new("x", Some("   "))).unwrap();
        assert_eq!(blank.label, None);

        let max = "l".repeat(MAX_LABEL_CHARS);
        assert!(validate_input(&NoteInput::new("x", Some(&max))).is_ok());

        let over = "l".repeat(MAX_LABEL_CHARS + 1);
        assert_eq!(
            validate_input(&NoteInput::new("x", Some(&over))),
            Err(ValidationError::LabelTooLong)
        );
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let over = "l".repeat(MAX_LABEL_CHARS + 1);
        assert_eq!(
            validate_input(&NoteInput::new("  ", Some(&over))),
            Err(ValidationError::TextRequired)
        );
    }

    #[test]
    fn test_valid_row() {
        let note = validate_row(row(" Call mom ", Some(""))).unwrap();
        assert_eq!(note.text, "Call mom");
        assert_eq!(note.label, None);
        assert_eq!(note.created_at.to_rfc3339(), "2024-05-01T12:30:00.123456+00:00");
    }

    #[test]
    fn test_row_with_bad_id_rejected() {
        let mut bad = row("text", None);
        bad.id = "42".to_string();
        assert!(matches!(validate_row(bad), Err(ValidationError::MalformedRow(_))));
    }

    #[test]
    fn test_row_with_bad_timestamp_rejected() {
        let mut bad = row("text", None);
        bad.created_at = "yesterday".to_string();
        assert!(matches!(validate_row(bad), Err(ValidationError::MalformedRow(_))));
    }

    #[test]
    fn test_one_bad_row_fails_batch() {
        let rows = vec![row("ok", None), row("", None)];
        assert_eq!(validate_rows(rows), Err(ValidationError::TextRequired));
    }
}
