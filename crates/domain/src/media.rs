//! Media gallery domain vocabulary.
//!
//! Query options are an explicit tagged structure: recognized sort keys
//! and filter fields are enumerated here and validated at the boundary
//! before they reach the services.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use velora_core::AppError;

/// Unique identifier for a media gallery record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId(Uuid);

impl MediaId {
    /// Creates a new random media identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a media identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Kind of asset stored at the media host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaResourceType {
    /// Raster or vector image.
    Image,
    /// Video asset.
    Video,
    /// Any other binary payload.
    Raw,
}

impl MediaResourceType {
    /// Returns the stable storage value for this resource type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Raw => "raw",
        }
    }
}

impl FromStr for MediaResourceType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "raw" => Ok(Self::Raw),
            _ => Err(AppError::Validation(format!(
                "unknown media resource type '{value}'"
            ))),
        }
    }
}

/// Recognized sort keys for gallery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSortKey {
    /// Upload timestamp (default).
    UploadedAt,
    /// File size in bytes.
    Size,
    /// Original file name.
    OriginalName,
    /// File format.
    Format,
    /// Image width in pixels.
    Width,
    /// Image height in pixels.
    Height,
}

impl MediaSortKey {
    /// Returns the transport value for this sort key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadedAt => "uploaded_at",
            Self::Size => "size",
            Self::OriginalName => "original_name",
            Self::Format => "format",
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

impl Default for MediaSortKey {
    fn default() -> Self {
        Self::UploadedAt
    }
}

impl FromStr for MediaSortKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "uploaded_at" => Ok(Self::UploadedAt),
            "size" => Ok(Self::Size),
            "original_name" => Ok(Self::OriginalName),
            "format" => Ok(Self::Format),
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            _ => Err(AppError::Validation(format!(
                "unknown media sort key '{value}'"
            ))),
        }
    }
}

/// Sort direction for gallery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order (default for timestamps).
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Desc
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort direction '{value}'"
            ))),
        }
    }
}
