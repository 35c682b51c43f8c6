pub mod show;
pub mod swipe;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use feeddeck::store::FetchOutcome;
use feeddeck::{FeedItem, FeedStore, FeedTransport};

pub(crate) fn format_item(item: &FeedItem, is_cursor: bool) -> String {
    let marker = if is_cursor { '>' } else { ' ' };
    let location = if item.location.is_empty() {
        String::new()
    } else {
        format!(" ({})", item.location)
    };
    let photo = item
        .photo_url
        .as_ref()
        .map(|url| format!("  {url}"))
        .unwrap_or_default();
    format!(
        "{marker} {}  {}{location}{photo}",
        item.user_id, item.display_name
    )
}

/// Makes the deck visible (one fetch) and hands back the transport error,
/// if any, for reporting. The store itself only records `Failed`.
pub(crate) fn fetch<T: FeedTransport>(store: &FeedStore<T>) -> Option<String> {
    let sp = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        sp.set_style(style);
    }
    sp.enable_steady_tick(Duration::from_millis(80));
    sp.set_message("Fetching feed...");

    let outcome = store.on_became_visible();

    sp.finish_and_clear();
    match outcome {
        FetchOutcome::Failed(reason) => Some(reason),
        FetchOutcome::Loaded | FetchOutcome::Superseded => None,
    }
}
