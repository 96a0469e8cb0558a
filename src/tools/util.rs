//! Argument conversion helpers shared by the tools

use crate::docbase::Scope;
use crate::error::AppError;
use std::num::IntErrorKind;

/// Largest page size DocBase serves
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const DEFAULT_PAGE: u32 = 1;

/// Split a comma-separated list, trimming each element and dropping empty ones
pub fn split_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse comma-separated group IDs, skipping elements that are not integers
pub fn parse_group_ids(input: &str) -> Vec<i64> {
    split_comma_list(input)
        .iter()
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

/// Parse an ID argument such as `post_id`
pub fn parse_id(field: &str, value: &str) -> Result<i64, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::missing(field));
    }
    value
        .parse::<i64>()
        .map_err(|_| AppError::InvalidInput(format!("{} must be a valid number", field)))
}

/// Parse a count argument such as `page`. Any integer is accepted: values
/// past `u32::MAX` saturate and negatives read as zero, which the client
/// leaves out of the query.
pub fn parse_count(field: &str, value: &str) -> Result<u32, AppError> {
    match value.trim().parse::<i64>() {
        Ok(n) => Ok(u32::try_from(n.max(0)).unwrap_or(u32::MAX)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(u32::MAX),
            IntErrorKind::NegOverflow => Ok(0),
            _ => Err(AppError::InvalidInput(format!("{} must be a number", field))),
        },
    }
}

/// Map a scope argument; absent or empty input yields `None`
pub fn parse_scope(value: Option<&str>) -> Result<Option<Scope>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<Scope>()
            .map(Some)
            .map_err(|e| AppError::InvalidInput(e.to_string())),
    }
}

/// Group IDs for a group-scoped post; at least one must survive parsing
pub fn require_groups(groups: Option<&str>) -> Result<Vec<i64>, AppError> {
    let raw = groups.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::InvalidInput(
            "groups parameter is required when scope is 'group'".to_string(),
        ));
    }
    let ids = parse_group_ids(raw);
    if ids.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one valid group ID is required when scope is 'group'".to_string(),
        ));
    }
    Ok(ids)
}

/// Drop empty strings so they read as "not provided"
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comma_list() {
        assert_eq!(split_comma_list(" a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_comma_list("a,,b, "), vec!["a", "b"]);
        assert!(split_comma_list("").is_empty());
        assert!(split_comma_list(" , ,").is_empty());
    }

    #[test]
    fn test_parse_group_ids_skips_non_numeric() {
        assert_eq!(parse_group_ids("1, x, 3"), vec![1, 3]);
        assert_eq!(parse_group_ids("12abc"), Vec::<i64>::new());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("post_id", "42").unwrap(), 42);
        assert_eq!(parse_id("post_id", " 42 ").unwrap(), 42);
        let err = parse_id("post_id", "abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: post_id must be a valid number");
        let err = parse_id("post_id", "").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: post_id is required");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("page", "3").unwrap(), 3);
        assert_eq!(parse_count("page", "-5").unwrap(), 0);
        assert_eq!(parse_count("per_page", "5000000000").unwrap(), u32::MAX);
        assert_eq!(parse_count("per_page", "99999999999999999999999").unwrap(), u32::MAX);
        assert!(parse_count("page", "1.5").is_err());
        assert!(parse_count("per_page", "ten").unwrap_err().to_string().contains("per_page"));
    }

    #[test]
    fn test_parse_scope() {
        assert_eq!(parse_scope(None).unwrap(), None);
        assert_eq!(parse_scope(Some("")).unwrap(), None);
        assert_eq!(parse_scope(Some("everyone")).unwrap(), Some(Scope::Everyone));
        assert_eq!(parse_scope(Some("group")).unwrap(), Some(Scope::Group));
        assert!(parse_scope(Some("team")).is_err());
    }

    #[test]
    fn test_require_groups() {
        assert_eq!(require_groups(Some("1, x, 3")).unwrap(), vec![1, 3]);
        assert!(require_groups(None).is_err());
        assert!(require_groups(Some("")).is_err());
        assert!(require_groups(Some("x, y")).is_err());
    }
}
