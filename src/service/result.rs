//! Uniform outcome record returned by every resource service.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Recognized failure kinds.
///
/// Serialized as the bare kind name (e.g. `"ValidationError"`), which is also
/// what the command line prints after `Error:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field is missing or empty, or a value is out of range.
    ValidationError,
    /// The service or its client could not be constructed.
    ServiceError,
    /// The client could not be rebound to an overridden region.
    ConfigurationError,
    /// Bucket name is taken by another account.
    BucketAlreadyExists,
    /// Bucket name is already owned by the caller.
    BucketAlreadyOwnedByYou,
    /// The machine image id was rejected.
    InvalidAmiId,
    /// The key pair name was rejected.
    InvalidKeyPair,
    /// The instance type is unknown or not offered in the region.
    InvalidInstanceType,
    /// The region has no capacity left for the instance type.
    InsufficientCapacity,
    /// The caller lacks permission for the operation.
    UnauthorizedOperation,
    /// Any provider failure without a more specific kind.
    UnknownError,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::ServiceError => "ServiceError",
            Self::ConfigurationError => "ConfigurationError",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::BucketAlreadyOwnedByYou => "BucketAlreadyOwnedByYou",
            Self::InvalidAmiId => "InvalidAMIID",
            Self::InvalidKeyPair => "InvalidKeyPair",
            Self::InvalidInstanceType => "InvalidInstanceType",
            Self::InsufficientCapacity => "InsufficientCapacity",
            Self::UnauthorizedOperation => "UnauthorizedOperation",
            Self::UnknownError => "UnknownError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of a single create operation.
///
/// Results are built through [`ResourceResult::success`] or
/// [`ResourceResult::failure`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceResult {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorKind>,
}

impl ResourceResult {
    pub fn success(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// A failed outcome. An empty message is replaced by the kind name so a
    /// failure always carries something readable.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = kind.to_string();
        }
        Self {
            success: false,
            message,
            data: None,
            error: Some(kind),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    pub const fn error(&self) -> Option<ErrorKind> {
        self.error
    }
}
