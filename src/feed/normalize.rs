use itertools::Itertools;
use log::debug;
use url::Url;

use super::{FeedItem, RawFeedRecord};

const DISPLAY_NAME_SEPARATOR: &str = " * ";

fn parse_photo_url(raw: Option<&str>) -> Option<Url> {
    // Upstream data is unreliable; a bad URL only loses the photo.
    raw.and_then(|s| Url::parse(s).ok())
}

fn display_name(name: Option<&str>, age: Option<i64>) -> String {
    [name.map(str::to_string), age.map(|a| a.to_string())]
        .into_iter()
        .flatten()
        .join(DISPLAY_NAME_SEPARATOR)
}

fn normalize_record(record: &RawFeedRecord) -> Option<FeedItem> {
    let Some(user_id) = record.user_id else {
        debug!("dropping feed record without user_id: {:?}", record.name);
        return None;
    };

    Some(FeedItem {
        user_id,
        photo_url: parse_photo_url(record.profile_picture_url.as_deref()),
        display_name: display_name(record.name.as_deref(), record.age),
        location: record.location.clone().unwrap_or_default(),
    })
}

/// Maps raw server records to deck items, preserving order.
///
/// Records without a `user_id` are dropped; every other missing or malformed
/// field degrades to a default. This never fails.
pub fn normalize(records: &[RawFeedRecord]) -> Vec<FeedItem> {
    records.iter().filter_map(normalize_record).collect()
}
