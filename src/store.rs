use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Mutex, MutexGuard, PoisonError};

use itertools::Itertools;
use log::{debug, info, warn};

use crate::feed::{self, FeedItem, RawFeedRecord};
use crate::transport::{FeedTransport, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loading,
    Loaded,
    Failed,
}

/// Transient overlay shown on an item while it is being dragged vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    Down,
    Date,
}

impl Notification {
    pub fn label(self) -> &'static str {
        match self {
            Notification::Down => "DOWN",
            Notification::Date => "DATE",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A consistent view of the store, published after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub phase: Phase,
    pub deck: Vec<FeedItem>,
    pub cursor: Option<FeedItem>,
    pub notifications: HashMap<i64, Notification>,
}

impl FeedSnapshot {
    pub fn notification_for(&self, item: &FeedItem) -> Option<Notification> {
        self.notifications.get(&item.user_id).copied()
    }
}

/// Identifies one fetch. Only the most recently issued ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// What a completed fetch did to the store. `Failed` carries the transport
/// error text for logging or reporting; subscribers only see `Phase::Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    Failed(String),
    Superseded,
}

/// Snapshots buffered per subscriber before further publishes skip it.
const SUBSCRIBER_BUFFER: usize = 64;

struct State {
    phase: Phase,
    deck: Vec<FeedItem>,
    cursor: Option<usize>,
    notifications: HashMap<i64, Notification>,
    generation: u64,
    subscribers: Vec<SyncSender<FeedSnapshot>>,
}

impl State {
    fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            phase: self.phase,
            deck: self.deck.clone(),
            cursor: self.cursor.map(|i| self.deck[i].clone()),
            notifications: self.notifications.clone(),
        }
    }

    // Called with the lock held, so every subscriber sees the same order.
    // A subscriber with a full buffer misses this snapshot; a disconnected
    // one is dropped.
    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|subscriber| match subscriber.try_send(snapshot.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    debug!("subscriber buffer full, skipping snapshot");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    fn position(&self, item: &FeedItem) -> Option<usize> {
        self.deck.iter().position(|i| i.user_id == item.user_id)
    }

    fn replace_deck(&mut self, phase: Phase, deck: Vec<FeedItem>) {
        self.notifications
            .retain(|user_id, _| deck.iter().any(|i| i.user_id == *user_id));
        self.cursor = if deck.is_empty() { None } else { Some(0) };
        self.deck = deck;
        self.phase = phase;
    }
}

fn build_deck(records: &[RawFeedRecord]) -> Vec<FeedItem> {
    let items = feed::normalize(records);
    let normalized = items.len();
    let deck: Vec<FeedItem> = items.into_iter().unique_by(|i| i.user_id).collect();
    if deck.len() < normalized {
        warn!(
            "dropped {} feed items with duplicate user_id",
            normalized - deck.len()
        );
    }
    deck
}

/// Owns the deck, the cursor and the notification map.
///
/// All mutations go through `&self` methods that serialize on one lock and
/// publish a full [`FeedSnapshot`] to subscribers before releasing it. The
/// transport call itself runs outside the lock.
pub struct FeedStore<T> {
    transport: T,
    state: Mutex<State>,
}

impl<T: FeedTransport> FeedStore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(State {
                phase: Phase::Empty,
                deck: Vec::new(),
                cursor: None,
                notifications: HashMap::new(),
                generation: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.lock().snapshot()
    }

    /// Returns a receiver that gets the current snapshot immediately and one
    /// snapshot per subsequent mutation.
    ///
    /// Each receiver buffers at most `SUBSCRIBER_BUFFER` snapshots. While the
    /// buffer is full, new snapshots are skipped for that receiver; every
    /// snapshot is a full state, so the next one it does get is current.
    pub fn subscribe(&self) -> Receiver<FeedSnapshot> {
        let (tx, rx) = mpsc::sync_channel(SUBSCRIBER_BUFFER);
        let mut state = self.lock();
        if tx.try_send(state.snapshot()).is_ok() {
            state.subscribers.push(tx);
        }
        rx
    }

    /// Fetches the feed and replaces the deck with the result.
    pub fn on_became_visible(&self) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = self.transport.fetch_feed();
        self.complete_fetch(ticket, result)
    }

    /// Enters `Loading` and supersedes any fetch still in flight.
    pub fn begin_fetch(&self) -> FetchTicket {
        let mut state = self.lock();
        state.generation += 1;
        state.phase = Phase::Loading;
        state.publish();
        debug!("feed fetch {} started", state.generation);
        FetchTicket {
            generation: state.generation,
        }
    }

    /// Applies a fetch result as one publish. Stale tickets are discarded.
    pub fn complete_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<Vec<RawFeedRecord>, TransportError>,
    ) -> FetchOutcome {
        let mut state = self.lock();
        if ticket.generation != state.generation {
            debug!(
                "discarding result of feed fetch {}, superseded by {}",
                ticket.generation, state.generation
            );
            return FetchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(records) => {
                let deck = build_deck(&records);
                info!("feed loaded: {} of {} records usable", deck.len(), records.len());
                state.replace_deck(Phase::Loaded, deck);
                FetchOutcome::Loaded
            }
            Err(e) => {
                warn!("feed fetch failed: {}", e);
                state.replace_deck(Phase::Failed, Vec::new());
                FetchOutcome::Failed(e.to_string())
            }
        };
        state.publish();
        outcome
    }

    /// Moves the cursor to the item after `from`, clamped to the last item.
    /// Returns whether the cursor moved.
    pub fn advance_cursor(&self, from: &FeedItem) -> bool {
        let mut state = self.lock();
        if state.phase != Phase::Loaded {
            return false;
        }
        let Some(index) = state.position(from) else {
            return false;
        };
        let next = (index + 1).min(state.deck.len() - 1);
        if state.cursor == Some(next) {
            return false;
        }
        state.cursor = Some(next);
        state.publish();
        true
    }

    pub fn set_notification(&self, item: &FeedItem, notification: Notification) -> bool {
        let mut state = self.lock();
        if state.position(item).is_none() {
            return false;
        }
        if state.notifications.insert(item.user_id, notification) == Some(notification) {
            return false;
        }
        state.publish();
        true
    }

    pub fn clear_notification(&self, item: &FeedItem) -> bool {
        let mut state = self.lock();
        if state.notifications.remove(&item.user_id).is_none() {
            return false;
        }
        state.publish();
        true
    }
}
