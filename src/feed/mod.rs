pub mod normalize;

use serde::{Deserialize, Serialize};
use url::Url;

pub use normalize::normalize;

/// A profile record as the server sends it. Every key may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeedRecord {
    pub name: Option<String>,
    pub user_id: Option<i64>,
    pub age: Option<i64>,
    #[serde(rename = "loc")]
    pub location: Option<String>,
    pub about_me: Option<String>,
    #[serde(rename = "profile_pic_url")]
    pub profile_picture_url: Option<String>,
}

/// A view-ready deck entry. `user_id` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedItem {
    pub user_id: i64,
    pub photo_url: Option<Url>,
    pub display_name: String,
    pub location: String,
}
