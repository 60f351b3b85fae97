//! Simulated incoming call
//!
//! A one-shot trigger that rings the phone once, a fixed delay after start,
//! with a pseudo-randomly chosen contact. It talks to its target only through
//! a weak reference, so a torn-down controller is never touched.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Weak;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::directory::ContactDirectory;
use crate::timers::ScheduledTask;
use crate::types::Contact;

/// Receiver of simulated incoming calls
pub trait IncomingCallSink: Send + Sync + 'static {
    fn ring(&self, contact: Contact);
}

/// One-shot incoming-call generator
pub struct IncomingCallSimulator {
    directory: ContactDirectory,
    delay: Duration,
    rng: StdRng,
}

impl IncomingCallSimulator {
    /// A seeded simulator always picks the same contact sequence
    pub fn new(directory: ContactDirectory, delay: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            directory,
            delay,
            rng,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pick_contact(&mut self) -> Contact {
        self.directory.choose_random(&mut self.rng).clone()
    }

    /// Arm the trigger. Cancelling or dropping the returned task disarms it.
    pub fn schedule<S: IncomingCallSink>(mut self, runtime: &Handle, sink: Weak<S>) -> ScheduledTask {
        let delay = self.delay;
        ScheduledTask::once(runtime, "simulated-incoming", delay, async move {
            let Some(sink) = sink.upgrade() else {
                debug!("Simulated incoming call target is gone");
                return;
            };
            let contact = self.pick_contact();
            info!("Simulated incoming call from {} ({})", contact.name, contact.phone);
            sink.ring(contact);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        rings: Mutex<Vec<Contact>>,
    }

    impl IncomingCallSink for Recorder {
        fn ring(&self, contact: Contact) {
            self.rings.lock().push(contact);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_exactly_once_after_delay() {
        let sink = Arc::new(Recorder::default());
        let sim = IncomingCallSimulator::new(
            ContactDirectory::with_default_contacts(),
            Duration::from_secs(5),
            Some(1),
        );
        let _task = sim.schedule(&Handle::current(), Arc::downgrade(&sink));

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert!(sink.rings.lock().is_empty());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(sink.rings.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_simulator_never_rings() {
        let sink = Arc::new(Recorder::default());
        let sim = IncomingCallSimulator::new(
            ContactDirectory::with_default_contacts(),
            Duration::from_secs(5),
            None,
        );
        let task = sim.schedule(&Handle::current(), Arc::downgrade(&sink));
        task.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(sink.rings.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_target_is_not_touched() {
        let sink = Arc::new(Recorder::default());
        let weak = Arc::downgrade(&sink);
        let sim = IncomingCallSimulator::new(
            ContactDirectory::with_default_contacts(),
            Duration::from_secs(1),
            None,
        );
        let task = sim.schedule(&Handle::current(), weak.clone());
        drop(sink);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(task.is_finished());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_seeded_picks_repeat() {
        let dir = ContactDirectory::with_default_contacts();
        let mut a = IncomingCallSimulator::new(dir.clone(), Duration::ZERO, Some(42));
        let mut b = IncomingCallSimulator::new(dir, Duration::ZERO, Some(42));
        for _ in 0..5 {
            assert_eq!(a.pick_contact().id, b.pick_contact().id);
        }
    }
}
