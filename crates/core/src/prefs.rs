#![forbid(unsafe_code)]

use serde_json::Value;

/// Declared data type of a preference definition. Codes match the
/// `PREFERENCE_DATA_TYPE` lookup domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreferenceType {
    String,
    Integer,
    Number,
    Boolean,
    Json,
}

impl PreferenceType {
    pub fn code(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Integer => "INTEGER",
            Self::Number => "NUMBER",
            Self::Boolean => "BOOLEAN",
            Self::Json => "JSON",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "STRING" => Some(Self::String),
            "INTEGER" => Some(Self::Integer),
            "NUMBER" => Some(Self::Number),
            "BOOLEAN" => Some(Self::Boolean),
            "JSON" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Json => value.is_object() || value.is_array(),
        }
    }
}

impl std::fmt::Display for PreferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shapes_are_checked_per_type() {
        assert!(PreferenceType::String.accepts(&json!("dark")));
        assert!(!PreferenceType::String.accepts(&json!({"mode": "dark"})));
        assert!(PreferenceType::Integer.accepts(&json!(12)));
        assert!(!PreferenceType::Integer.accepts(&json!(1.5)));
        assert!(PreferenceType::Number.accepts(&json!(1.5)));
        assert!(PreferenceType::Boolean.accepts(&json!(false)));
        assert!(!PreferenceType::Boolean.accepts(&json!("false")));
        assert!(PreferenceType::Json.accepts(&json!([1, 2])));
        assert!(!PreferenceType::Json.accepts(&Value::Null));
    }

    #[test]
    fn codes_parse_case_insensitively() {
        assert_eq!(PreferenceType::parse("boolean"), Some(PreferenceType::Boolean));
        assert_eq!(PreferenceType::parse("DATE"), None);
    }
}
