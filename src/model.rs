use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written into a descriptive field when EC2 has no value for it.
pub const NULL_SENTINEL: &str = "null";

/// Identifier of a machine image, e.g. `ami-0abcdef1234567890`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of an EC2 instance, e.g. `i-0123456789abcdef0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Descriptive fields of one image as returned by `DescribeImages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub description: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub owner_id: Option<String>,
}

/// One entry of the inventory report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    #[serde(rename = "ImageDescription")]
    pub description: String,
    #[serde(rename = "ImageName")]
    pub name: String,
    #[serde(rename = "ImageLocation")]
    pub location: String,
    #[serde(rename = "OwnerId")]
    pub owner_id: String,
    #[serde(rename = "InstanceIds")]
    pub instance_ids: Vec<InstanceId>,
}

impl ImageRecord {
    /// Builds a record, replacing absent or empty fields with [`NULL_SENTINEL`].
    pub fn new(metadata: ImageMetadata, instance_ids: Vec<InstanceId>) -> Self {
        Self {
            description: or_sentinel(metadata.description),
            name: or_sentinel(metadata.name),
            location: or_sentinel(metadata.location),
            owner_id: or_sentinel(metadata.owner_id),
            instance_ids,
        }
    }
}

fn or_sentinel(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NULL_SENTINEL.to_string())
}
