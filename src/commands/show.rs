use anyhow::bail;

use feeddeck::{FeedSnapshot, FeedStore, FeedTransport};

use super::{fetch, format_item};

fn render_deck(snapshot: &FeedSnapshot) -> String {
    if snapshot.deck.is_empty() {
        return "No profiles.\n".to_string();
    }
    let cursor = snapshot.cursor.as_ref().map(|c| c.user_id);
    snapshot
        .deck
        .iter()
        .map(|item| format_item(item, cursor == Some(item.user_id)) + "\n")
        .collect()
}

pub(crate) fn cmd_show<T: FeedTransport>(store: &FeedStore<T>) -> anyhow::Result<()> {
    let error = fetch(store);
    print!("{}", render_deck(&store.snapshot()));
    if let Some(e) = error {
        bail!("Error fetching feed: {}", e);
    }
    Ok(())
}
