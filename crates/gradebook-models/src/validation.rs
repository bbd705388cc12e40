use validator::ValidationError;

/// Rejects strings made only of whitespace.
///
/// `length(min = ..)` alone would accept `"   "` as a name.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Trims a required text field.
pub fn clean(value: &str) -> String {
    value.trim().to_string()
}

/// Trims an optional text field, mapping empty input to `None`.
///
/// Form-style clients send `""` for an untouched optional input.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `true` for a present value made only of whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().is_empty())
}
