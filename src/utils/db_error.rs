//! Helpers for classifying database errors.

/// Returns the violated constraint name when `e` is a unique violation.
///
/// Unnamed violations are reported as `"unknown"`.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<String> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    Some(db_err.constraint().unwrap_or("unknown").to_string())
}
