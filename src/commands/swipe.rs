use anyhow::{Context, bail};
use log::info;

use feeddeck::{FeedStore, FeedTransport, GestureInterpreter, GestureSession};

use super::{fetch, format_item};

pub(crate) fn cmd_swipe<T: FeedTransport>(
    store: &FeedStore<T>,
    from: f64,
    to: f64,
    item: Option<i64>,
) -> anyhow::Result<()> {
    if let Some(e) = fetch(store) {
        bail!("Error fetching feed: {}", e);
    }

    let snapshot = store.snapshot();
    let target = match item {
        Some(user_id) => snapshot
            .deck
            .iter()
            .find(|i| i.user_id == user_id)
            .cloned()
            .with_context(|| format!("No profile with id {}", user_id))?,
        None => snapshot.cursor.context("No profiles.")?,
    };

    let interpreter = GestureInterpreter::default();
    let session = GestureSession::new(target, from);
    let change = interpreter.apply_progress(store, &session, to);
    info!("drag on {} showed {:?}", session.item.user_id, change);
    let outcome = interpreter.apply_end(store, &session, to);
    info!("swipe on {} advance={}", session.item.user_id, outcome.advance);

    if let Some(cursor) = store.snapshot().cursor {
        println!("{}", format_item(&cursor, true));
    }
    Ok(())
}
