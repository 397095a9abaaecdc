/// Failure of a create/update use case.
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("{0}")]
    Invalid(String),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Trims `value` and rejects it when blank.
pub fn required(field: &str, value: &str) -> Result<String, WriteError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WriteError::Invalid(format!("{field} may not be blank")));
    }
    Ok(trimmed.to_string())
}

pub fn optional_required(field: &str, value: Option<&str>) -> Result<Option<String>, WriteError> {
    value.map(|v| required(field, v)).transpose()
}
