//! Latest-value slot shared between the capture loop and readers.

use crate::types::{Event, Frame};
use std::sync::{Arc, PoisonError, RwLock};

/// One published (event, image) pair.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub event: Event,
    pub image: Option<Arc<Frame>>,
    /// Number of publications so far; 0 for the initial empty snapshot.
    pub sequence: u64,
}

/// Holds the most recent [`Snapshot`].
///
/// Each publish swaps in a new immutable snapshot, so a reader always sees
/// an event together with the image it was published with. The lock only
/// guards the pointer swap; image data is built before it is taken.
#[derive(Debug, Default)]
pub struct StatePublisher {
    slot: RwLock<Arc<Snapshot>>,
}

impl StatePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, event: Event, image: Frame) {
        let image = Some(Arc::new(image));
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(Snapshot {
            event,
            image,
            sequence: slot.sequence + 1,
        });
        *slot = next;
    }

    /// The current snapshot; never fails.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*slot)
    }

    pub fn event(&self) -> Event {
        self.snapshot().event
    }

    pub fn image(&self) -> Option<Arc<Frame>> {
        self.snapshot().image.clone()
    }

    pub fn sequence(&self) -> u64 {
        self.snapshot().sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    const EVENTS: [Event; 6] = [
        Event::None,
        Event::Rock,
        Event::Paper,
        Event::Scissors,
        Event::Lizard,
        Event::Spock,
    ];

    fn tagged(event: Event) -> Frame {
        let idx = EVENTS.iter().position(|e| *e == event).unwrap() as u8;
        Frame::from_pixel(8, 8, Rgb([idx, idx, idx]))
    }

    #[test]
    fn test_initial_state_is_empty() {
        let publisher = StatePublisher::new();
        assert_eq!(publisher.event(), Event::None);
        assert!(publisher.image().is_none());
        assert_eq!(publisher.sequence(), 0);
    }

    #[test]
    fn test_publish_replaces_pair() {
        let publisher = StatePublisher::new();
        publisher.publish(Event::Rock, tagged(Event::Rock));
        publisher.publish(Event::Spock, tagged(Event::Spock));

        let snap = publisher.snapshot();
        assert_eq!(snap.event, Event::Spock);
        assert_eq!(snap.image.as_deref(), Some(&tagged(Event::Spock)));
        assert_eq!(snap.sequence, 2);
    }

    #[test]
    fn test_old_snapshot_stays_valid() {
        let publisher = StatePublisher::new();
        publisher.publish(Event::Paper, tagged(Event::Paper));
        let held = publisher.snapshot();
        publisher.publish(Event::Lizard, tagged(Event::Lizard));
        assert_eq!(held.event, Event::Paper);
        assert_eq!(publisher.event(), Event::Lizard);
    }

    #[test]
    fn test_concurrent_reads_never_tear() {
        let publisher = Arc::new(StatePublisher::new());
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let publisher = Arc::clone(&publisher);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut observed = 0u64;
                    while !done.load(Ordering::Acquire) {
                        let snap = publisher.snapshot();
                        if let Some(image) = &snap.image {
                            assert_eq!(**image, tagged(snap.event), "torn snapshot");
                            observed += 1;
                        }
                    }
                    observed
                })
            })
            .collect();

        for i in 0..5_000 {
            let event = EVENTS[1 + i % 5];
            publisher.publish(event, tagged(event));
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(publisher.sequence(), 5_000);
    }
}
