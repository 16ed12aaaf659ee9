use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
///
/// Hyphenated aliases are accepted (`in-progress` parses as `in_progress`).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use tally_core::enums::{AuditStatus, QuestionType};

    use super::parse_enum;

    #[test]
    fn parses_snake_case_enum() {
        let status: AuditStatus = parse_enum("completed", "status").expect("status should parse");
        assert_eq!(status, AuditStatus::Completed);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: AuditStatus = parse_enum("in-progress", "status").expect("status should parse");
        assert_eq!(status, AuditStatus::InProgress);

        let question_type: QuestionType =
            parse_enum("file-upload", "type").expect("type should parse");
        assert_eq!(question_type, QuestionType::FileUpload);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<AuditStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }
}
