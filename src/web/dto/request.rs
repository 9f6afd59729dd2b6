//! Request DTOs.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::content::{Category, ChallengeFilter};
use crate::upload::FinalizeRequest;

/// Login request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Finalize request body.
///
/// Every field is optional at the JSON level so a missing `tempFilename`
/// is reported as a bad request by the store, not as a parse failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FinalizeBody {
    pub temp_filename: String,
    pub final_filename: Option<String>,
    pub delete_old_file: Option<String>,
}

impl From<FinalizeBody> for FinalizeRequest {
    fn from(body: FinalizeBody) -> Self {
        FinalizeRequest {
            temp_filename: body.temp_filename,
            final_filename: body.final_filename,
            delete_old_file: body.delete_old_file,
        }
    }
}

/// `?filename=` query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilenameQuery {
    pub filename: Option<String>,
}

impl FilenameQuery {
    /// The filename, treating an empty value as absent.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| !f.is_empty())
    }
}

/// Public challenge listing query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChallengeListQuery {
    /// CTF id.
    pub ctf: Option<String>,
}

/// Admin challenge search query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChallengeSearchQuery {
    /// Title substring.
    pub q: Option<String>,
    /// Comma-separated CTF ids.
    pub ctf: Option<String>,
    /// Comma-separated categories.
    pub category: Option<String>,
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl ChallengeSearchQuery {
    /// Build a filter. Unknown categories are a bad request.
    pub fn to_filter(&self) -> crate::Result<ChallengeFilter> {
        let categories = split_list(self.category.as_deref())
            .map(str::parse::<Category>)
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(ChallengeFilter {
            query: self.q.clone().filter(|q| !q.trim().is_empty()),
            ctf_ids: split_list(self.ctf.as_deref()).map(str::to_string).collect(),
            categories,
        })
    }
}
