//! Resolution outcome types shared by every resolver.

use serde::{Deserialize, Serialize};

/// Classifies why a resolution fell back to the caller-supplied default.
///
/// `FlagNotFound` and `TypeMismatch` are expected, non-exceptional
/// conditions; `General` covers infrastructure failures (connection loss,
/// timeouts) that are contained at the resolution boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    FlagNotFound,
    TypeMismatch,
    General,
}

/// The outcome of resolving one flag.
///
/// On success `value` is the resolved value and `error_kind` is `None`.
/// On any failure `value` carries the caller-supplied default and
/// `error_kind`/`error_message` describe what went wrong. A resolution
/// never returns `Err` or panics; this struct is the whole contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionDetails<T> {
    pub flag_key: String,
    pub value: T,
    pub error_kind: Option<ErrorKind>,
    pub error_message: Option<String>,
}

impl<T> ResolutionDetails<T> {
    /// A successful resolution carrying the resolved value.
    pub fn ok(flag_key: impl Into<String>, value: T) -> Self {
        Self {
            flag_key: flag_key.into(),
            value,
            error_kind: None,
            error_message: None,
        }
    }

    /// A failed resolution carrying the caller-supplied default.
    pub fn error(
        flag_key: impl Into<String>,
        default_value: T,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            flag_key: flag_key.into(),
            value: default_value,
            error_kind: Some(kind),
            error_message: Some(message.into()),
        }
    }

    /// True when the resolution produced a real value rather than the
    /// caller default.
    pub fn is_ok(&self) -> bool {
        self.error_kind.is_none()
    }
}
