use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub bio: String,
    /// Comma-separated skills
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub skills: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub contact: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub location: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Profile {
    pub fn skill_list(&self) -> Vec<&str> {
        self.skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            bio: self.bio.clone(),
            skills: self.skills.clone(),
            contact: self.contact.clone(),
        }
    }
}

/// Editable subset of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub bio: String,
    pub skills: String,
    pub contact: String,
}
