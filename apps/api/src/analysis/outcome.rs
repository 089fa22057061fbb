use crate::llm_client::LlmError;

/// Result of an LLM-backed analysis step.
///
/// Extraction and scoring never fail outright: when the model call or its
/// output is unusable the step substitutes a well-formed default record.
/// `Failed` keeps that substitution visible to callers that care.
#[derive(Debug)]
pub enum Analysis<T> {
    Ok(T),
    Failed { value: T, cause: LlmError },
}

impl<T> Analysis<T> {
    pub fn value(&self) -> &T {
        match self {
            Analysis::Ok(value) | Analysis::Failed { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Analysis::Ok(value) | Analysis::Failed { value, .. } => value,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Analysis::Failed { .. })
    }

    pub fn cause(&self) -> Option<&LlmError> {
        match self {
            Analysis::Ok(_) => None,
            Analysis::Failed { cause, .. } => Some(cause),
        }
    }

    /// Maps the carried value, keeping the success/failure tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Analysis<U> {
        match self {
            Analysis::Ok(value) => Analysis::Ok(f(value)),
            Analysis::Failed { value, cause } => Analysis::Failed {
                value: f(value),
                cause,
            },
        }
    }

    /// Like `map`, for fallible transforms. The error is returned as-is.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Analysis<U>, E> {
        Ok(match self {
            Analysis::Ok(value) => Analysis::Ok(f(value)?),
            Analysis::Failed { value, cause } => Analysis::Failed {
                value: f(value)?,
                cause,
            },
        })
    }
}
