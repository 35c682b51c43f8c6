//! Vertical drag interpretation.
//!
//! The interpreter holds no state between calls: the rendering layer owns a
//! [`GestureSession`] per active drag and hands in each position update.
//! Decisions are written back through the [`FeedStore`] entry points.

use crate::feed::FeedItem;
use crate::store::{FeedStore, Notification};
use crate::transport::FeedTransport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Vertical movement at or below this is treated as noise.
    pub movement: f64,
    /// A finished drag must exceed this to turn the page.
    pub swipe_end: f64,
    /// Limit for the offset the rendering layer displays.
    pub display_clamp: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            movement: 10.0,
            swipe_end: 40.0,
            display_clamp: 70.0,
        }
    }
}

/// One active drag on a deck item.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub item: FeedItem,
    pub start_y: f64,
}

impl GestureSession {
    pub fn new(item: FeedItem, start_y: f64) -> Self {
        Self { item, start_y }
    }

    pub fn sample(&self, y: f64) -> GestureSample {
        GestureSample {
            start_y: self.start_y,
            y,
        }
    }
}

/// Start position and latest (or final) position of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub start_y: f64,
    pub y: f64,
}

impl GestureSample {
    /// Positive when the finger moved up the screen.
    fn translation(&self) -> f64 {
        self.start_y - self.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationChange {
    Set(Notification),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeOutcome {
    pub advance: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureInterpreter {
    thresholds: GestureThresholds,
}

impl GestureInterpreter {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> GestureThresholds {
        self.thresholds
    }

    pub fn progress(&self, sample: GestureSample) -> NotificationChange {
        let translation = sample.translation();
        if !translation.is_finite() || translation.abs() <= self.thresholds.movement {
            NotificationChange::Clear
        } else if translation < 0.0 {
            NotificationChange::Set(Notification::Down)
        } else {
            NotificationChange::Set(Notification::Date)
        }
    }

    pub fn end(&self, sample: GestureSample) -> SwipeOutcome {
        let translation = sample.translation();
        SwipeOutcome {
            advance: translation.is_finite() && translation.abs() > self.thresholds.swipe_end,
        }
    }

    /// Vertical offset to draw while dragging. Thresholds apply to the
    /// unclamped value, not to this one.
    pub fn display_offset(&self, sample: GestureSample) -> f64 {
        let limit = self.thresholds.display_clamp.abs();
        let offset = sample.y - sample.start_y;
        if offset.is_nan() || limit.is_nan() {
            return 0.0;
        }
        offset.clamp(-limit, limit)
    }

    pub fn apply_progress<T: FeedTransport>(
        &self,
        store: &FeedStore<T>,
        session: &GestureSession,
        y: f64,
    ) -> NotificationChange {
        let change = self.progress(session.sample(y));
        match change {
            NotificationChange::Set(notification) => {
                store.set_notification(&session.item, notification);
            }
            NotificationChange::Clear => {
                store.clear_notification(&session.item);
            }
        }
        change
    }

    pub fn apply_end<T: FeedTransport>(
        &self,
        store: &FeedStore<T>,
        session: &GestureSession,
        y: f64,
    ) -> SwipeOutcome {
        store.clear_notification(&session.item);
        let outcome = self.end(session.sample(y));
        if outcome.advance {
            store.advance_cursor(&session.item);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::RawFeedRecord;
    use crate::transport::TransportError;
    use rstest::rstest;

    fn sample(start_y: f64, y: f64) -> GestureSample {
        GestureSample { start_y, y }
    }

    fn store() -> FeedStore<impl FeedTransport> {
        let store = FeedStore::new(|| -> Result<Vec<RawFeedRecord>, TransportError> {
            Ok((1..=3)
                .map(|id| RawFeedRecord {
                    user_id: Some(id),
                    ..RawFeedRecord::default()
                })
                .collect())
        });
        store.on_became_visible();
        store
    }

    #[rstest]
    #[case(100.0, 95.0, NotificationChange::Clear)]
    #[case(100.0, 110.0, NotificationChange::Clear)]
    #[case(100.0, 90.0, NotificationChange::Clear)]
    #[case(100.0, 50.0, NotificationChange::Set(Notification::Date))]
    #[case(100.0, 89.0, NotificationChange::Set(Notification::Date))]
    #[case(100.0, 111.0, NotificationChange::Set(Notification::Down))]
    #[case(100.0, 300.0, NotificationChange::Set(Notification::Down))]
    fn test_progress(#[case] start_y: f64, #[case] y: f64, #[case] expected: NotificationChange) {
        let interpreter = GestureInterpreter::default();
        assert_eq!(interpreter.progress(sample(start_y, y)), expected);
    }

    #[rstest]
    #[case(100.0, 130.0, false)]
    #[case(100.0, 140.0, false)]
    #[case(100.0, 60.0, false)]
    #[case(100.0, 141.0, true)]
    #[case(100.0, 200.0, true)]
    #[case(100.0, 0.0, true)]
    fn test_end(#[case] start_y: f64, #[case] y: f64, #[case] advance: bool) {
        let interpreter = GestureInterpreter::default();
        assert_eq!(interpreter.end(sample(start_y, y)), SwipeOutcome { advance });
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_non_finite_samples_degrade_to_noop(#[case] y: f64) {
        let interpreter = GestureInterpreter::default();
        assert_eq!(interpreter.progress(sample(100.0, y)), NotificationChange::Clear);
        assert!(!interpreter.end(sample(100.0, y)).advance);
    }

    #[test]
    fn test_display_offset_is_clamped() {
        let interpreter = GestureInterpreter::default();
        assert_eq!(interpreter.display_offset(sample(100.0, 130.0)), 30.0);
        assert_eq!(interpreter.display_offset(sample(100.0, 300.0)), 70.0);
        assert_eq!(interpreter.display_offset(sample(100.0, -300.0)), -70.0);
        assert_eq!(interpreter.display_offset(sample(100.0, f64::NAN)), 0.0);
    }

    #[rstest]
    #[case(-70.0, 30.0)]
    #[case(-20.0, 20.0)]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 30.0)]
    fn test_display_offset_with_unusual_clamp(#[case] display_clamp: f64, #[case] expected: f64) {
        let interpreter = GestureInterpreter::new(GestureThresholds {
            display_clamp,
            ..GestureThresholds::default()
        });
        assert_eq!(interpreter.display_offset(sample(100.0, 130.0)), expected);
    }

    #[test]
    fn test_thresholds_use_unclamped_delta() {
        let interpreter = GestureInterpreter::new(GestureThresholds {
            movement: 10.0,
            swipe_end: 100.0,
            display_clamp: 70.0,
        });
        assert!(interpreter.end(sample(0.0, 150.0)).advance);
    }

    #[test]
    fn test_apply_progress_updates_store() {
        let store = store();
        let session = GestureSession::new(store.snapshot().deck[0].clone(), 100.0);
        let interpreter = GestureInterpreter::default();

        interpreter.apply_progress(&store, &session, 50.0);
        assert_eq!(
            store.snapshot().notification_for(&session.item),
            Some(Notification::Date)
        );

        interpreter.apply_progress(&store, &session, 150.0);
        assert_eq!(
            store.snapshot().notification_for(&session.item),
            Some(Notification::Down)
        );

        interpreter.apply_progress(&store, &session, 95.0);
        assert_eq!(store.snapshot().notification_for(&session.item), None);
    }

    #[test]
    fn test_short_swipe_clears_without_advancing() {
        let store = store();
        let session = GestureSession::new(store.snapshot().deck[0].clone(), 100.0);
        let interpreter = GestureInterpreter::default();
        interpreter.apply_progress(&store, &session, 130.0);

        let outcome = interpreter.apply_end(&store, &session, 130.0);

        assert!(!outcome.advance);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.notification_for(&session.item), None);
        assert_eq!(snapshot.cursor.map(|i| i.user_id), Some(1));
    }

    #[test]
    fn test_long_swipe_clears_and_advances() {
        let store = store();
        let session = GestureSession::new(store.snapshot().deck[0].clone(), 100.0);
        let interpreter = GestureInterpreter::default();
        interpreter.apply_progress(&store, &session, 200.0);

        let outcome = interpreter.apply_end(&store, &session, 200.0);

        assert!(outcome.advance);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.notification_for(&session.item), None);
        assert_eq!(snapshot.cursor.map(|i| i.user_id), Some(2));
    }

    #[test]
    fn test_swipe_on_last_item_stays_on_last() {
        let store = store();
        let session = GestureSession::new(store.snapshot().deck[2].clone(), 100.0);
        let interpreter = GestureInterpreter::default();

        interpreter.apply_end(&store, &session, 0.0);
        interpreter.apply_end(&store, &session, 0.0);

        assert_eq!(store.snapshot().cursor.map(|i| i.user_id), Some(3));
    }
}
