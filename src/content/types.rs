//! Content record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::upload::{UploadRef, UPLOADS_URL_PREFIX};
use crate::SiteError;

/// Avatar shown for members without an uploaded or linked picture.
pub const PLACEHOLDER_AVATAR: &str = "/placeholder-avatar.svg";

/// A record stored in one of the content collections.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name in the document store.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Generate a new record id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// CTF events
// ============================================================================

/// A CTF event the team played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ctf {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub banner_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Ctf {
    const COLLECTION: &'static str = "ctfs";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Create/update payload for a CTF.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CtfInput {
    #[validate(
        length(min = 1, message = "Slug is required."),
        custom(function = "validate_slug")
    )]
    pub slug: String,
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "validate_image_ref"))]
    pub banner_url: String,
}

// ============================================================================
// Challenges
// ============================================================================

/// Challenge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Web,
    Pwn,
    Crypto,
    Misc,
    Rev,
    #[serde(rename = "OSINT")]
    Osint,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Web,
        Category::Pwn,
        Category::Crypto,
        Category::Misc,
        Category::Rev,
        Category::Osint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Web => "Web",
            Category::Pwn => "Pwn",
            Category::Crypto => "Crypto",
            Category::Misc => "Misc",
            Category::Rev => "Rev",
            Category::Osint => "OSINT",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SiteError;

    /// Case-insensitive, so query strings like `?category=web` work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SiteError::Validation(format!("Unknown category: {s}")))
    }
}

/// A challenge write-up belonging to a CTF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub ctf_id: String,
    pub title: String,
    pub category: Category,
    pub description: String,
    /// Raw Markdown.
    pub writeup: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Challenge {
    const COLLECTION: &'static str = "challenges";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Create/update payload for a challenge.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeInput {
    #[validate(length(min = 1, message = "Please select a CTF."))]
    pub ctf_id: String,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    pub category: Category,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: String,
    #[validate(length(min = 1, message = "Write-up content is required."))]
    pub writeup: String,
    #[serde(default)]
    #[validate(custom(function = "validate_image_ref"))]
    pub image_url: Option<String>,
}

/// Filter for challenge listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeFilter {
    /// Case-insensitive substring of the title.
    pub query: Option<String>,
    /// Allowed CTF ids; empty means any.
    pub ctf_ids: Vec<String>,
    /// Allowed categories; empty means any.
    pub categories: Vec<Category>,
}

impl ChallengeFilter {
    pub fn for_ctf(ctf_id: impl Into<String>) -> Self {
        Self {
            ctf_ids: vec![ctf_id.into()],
            ..Default::default()
        }
    }

    pub fn matches(&self, challenge: &Challenge) -> bool {
        if let Some(query) = self.query.as_deref().map(str::trim) {
            if !query.is_empty()
                && !challenge
                    .title
                    .to_lowercase()
                    .contains(&query.to_lowercase())
            {
                return false;
            }
        }
        if !self.ctf_ids.is_empty() && !self.ctf_ids.contains(&challenge.ctf_id) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&challenge.category) {
            return false;
        }
        true
    }
}

// ============================================================================
// Team members
// ============================================================================

/// Social links of a member. Every field is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Social {
    pub instagram: String,
    pub twitter: String,
    pub github: String,
    pub linkedin: String,
    pub email: String,
    pub website: String,
}

/// A team member profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub social: Social,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for TeamMember {
    const COLLECTION: &'static str = "members";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Create/update payload for a team member.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberInput {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Role is required."))]
    pub role: String,
    #[serde(default)]
    pub social: Social,
    #[serde(default)]
    #[validate(custom(function = "validate_image_ref"))]
    pub avatar_url: String,
}

// ============================================================================
// Validators
// ============================================================================

/// Slugs are lowercase letters, digits and hyphens.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("slug").with_message(
            "Slug can only contain lowercase letters, numbers, and hyphens.".into(),
        ))
    }
}

/// Image references are empty, a single uploaded file, or an absolute http(s) URL.
///
/// Anything under `/uploads/` must name exactly one staged or permanent file.
pub fn validate_image_ref(value: &str) -> Result<(), ValidationError> {
    let valid = if value.starts_with(UPLOADS_URL_PREFIX) {
        UploadRef::from_url(value).is_some()
    } else {
        value.is_empty() || is_http_url(value)
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("image_ref")
            .with_message("Please enter a valid URL or upload an image.".into()))
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}
