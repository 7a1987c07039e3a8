use serde::Deserialize;

use crate::error::ApiError;

/// Query filter shared by the tag and ingredient lists. Integer
/// truthiness: any nonzero value restricts the list to records assigned to
/// at least one of the caller's recipes.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    #[serde(default)]
    pub assigned_only: i64,
}

impl ListFilter {
    pub fn assigned_only(&self) -> bool {
        self.assigned_only != 0
    }
}

/// Non-blank, trimmed name or a field-level validation error. No case
/// folding: tag/ingredient names match exactly.
pub fn validate_name(raw: &str) -> Result<&str, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::field("name", "this field may not be blank"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_only_uses_integer_truthiness() {
        let filter: ListFilter = serde_json::from_str("{}").unwrap();
        assert!(!filter.assigned_only());

        let filter: ListFilter = serde_json::from_str(r#"{"assigned_only": 0}"#).unwrap();
        assert!(!filter.assigned_only());

        let filter: ListFilter = serde_json::from_str(r#"{"assigned_only": 1}"#).unwrap();
        assert!(filter.assigned_only());

        let filter: ListFilter = serde_json::from_str(r#"{"assigned_only": 7}"#).unwrap();
        assert!(filter.assigned_only());
    }

    #[test]
    fn names_are_trimmed_not_case_folded() {
        assert_eq!(validate_name("  Vegan  ").unwrap(), "Vegan");
        assert_eq!(validate_name("VEGAN").unwrap(), "VEGAN");
        assert!(validate_name("   ").is_err());
        assert!(validate_name("").is_err());
    }
}
