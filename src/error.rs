use crate::model::ImageId;
use std::fmt;
use thiserror::Error;

/// EC2 error codes that mean the caller's credentials were rejected.
const AUTH_ERROR_CODES: &[&str] = &[
    "AuthFailure",
    "UnauthorizedOperation",
    "InvalidClientTokenId",
    "ExpiredToken",
    "RequestExpired",
    "SignatureDoesNotMatch",
    "MissingAuthenticationToken",
    "OptInRequired",
];

/// Failure of a single call against the compute API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authorized ({code}): {message}")]
    Unauthorized { code: String, message: String },
    #[error("{message}")]
    Call {
        code: Option<String>,
        message: String,
    },
}

impl ApiError {
    /// Classifies a failed call by its service error code.
    pub fn from_code(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some(code) if AUTH_ERROR_CODES.contains(&code) => ApiError::Unauthorized {
                code: code.to_string(),
                message,
            },
            code => ApiError::Call {
                code: code.map(str::to_string),
                message,
            },
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { code, .. } => Some(code),
            ApiError::Call { code, .. } => code.as_deref(),
        }
    }
}

/// The pipeline step a remote call was issued from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Scan,
    FindInstances(ImageId),
    DescribeImage(ImageId),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Scan => f.write_str("instance scan"),
            Stage::FindInstances(id) => write!(f, "instance lookup for image {id}"),
            Stage::DescribeImage(id) => write!(f, "metadata lookup for image {id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("authorization failed during {stage}")]
    Auth {
        stage: Stage,
        #[source]
        source: ApiError,
    },
    #[error("{stage} failed")]
    Query {
        stage: Stage,
        #[source]
        source: ApiError,
    },
    #[error("image {image_id} was not found")]
    NotFound { image_id: ImageId },
    #[error("failed to render the inventory report")]
    Serialization(#[from] serde_json::Error),
}

impl InventoryError {
    pub(crate) fn at(stage: Stage, source: ApiError) -> Self {
        match source {
            ApiError::Unauthorized { .. } => InventoryError::Auth { stage, source },
            ApiError::Call { .. } => InventoryError::Query { stage, source },
        }
    }

    /// The stage a remote failure originated from, if any.
    pub fn stage(&self) -> Option<&Stage> {
        match self {
            InventoryError::Auth { stage, .. } | InventoryError::Query { stage, .. } => Some(stage),
            InventoryError::NotFound { .. } | InventoryError::Serialization(_) => None,
        }
    }
}
