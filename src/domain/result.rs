//! Result type alias for elastictl

use super::errors::ElastictlError;

/// Result type alias for elastictl operations
///
/// # Examples
///
/// ```
/// use elastictl::domain::result::Result;
/// use elastictl::domain::errors::ElastictlError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ElastictlError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ElastictlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
