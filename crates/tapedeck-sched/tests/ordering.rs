//! Ordering and cancellation guarantees of the scheduler, checked over
//! random schedules.
//!
//! - Events fire in `(due_tick, schedule order)` order.
//! - Every event not cancelled fires exactly once.
//! - A cancelled event never fires, whether it is cancelled from outside
//!   or by another callback firing on the same tick.

use std::time::Duration;

use proptest::prelude::*;
use tapedeck_core::EventId;
use tapedeck_sched::{Scheduler, SchedulerConfig};

const FRAME: Duration = Duration::from_millis(16);

/// Fired event ids with the tick they fired on.
type Fired = Vec<(u64, EventId)>;

fn scheduler() -> Scheduler<Fired> {
    let mut s = Scheduler::new(SchedulerConfig::default()).expect("default config");
    s.start();
    s
}

fn record(id_slot: u64) -> impl FnOnce(&mut Fired, &mut Scheduler<Fired>) + 'static {
    move |fired: &mut Fired, s: &mut Scheduler<Fired>| {
        fired.push((s.current_tick().0, EventId(id_slot)));
    }
}

#[test]
fn events_due_later_fire_later() {
    let mut s = scheduler();
    let mut fired = Fired::new();
    s.schedule(100, record(0));
    s.schedule(50, record(1));
    for _ in 0..10 {
        s.tick(&mut fired, FRAME);
    }
    let order: Vec<EventId> = fired.iter().map(|&(_, id)| id).collect();
    assert_eq!(order, vec![EventId(1), EventId(0)]);
}

#[test]
fn cancel_before_due_tick_suppresses_callback() {
    let mut s = scheduler();
    let mut fired = Fired::new();
    let id = s.schedule(200, record(0));
    let due = s.due_tick(id).expect("pending").0;
    for _ in 0..due - 1 {
        s.tick(&mut fired, FRAME);
    }
    s.cancel(id);
    for _ in 0..due * 2 {
        s.tick(&mut fired, FRAME);
    }
    assert!(fired.is_empty());
    assert!(!s.is_pending(id));
}

proptest! {
    #[test]
    fn fires_in_due_then_fifo_order(
        durations in prop::collection::vec(0u64..300, 1..40),
        cancel_mask in prop::collection::vec(any::<bool>(), 40),
    ) {
        let mut s = scheduler();
        let mut fired = Fired::new();
        let mut expected = Vec::new();
        for (slot, ms) in durations.iter().enumerate() {
            let id = s.schedule(*ms, record(slot as u64));
            prop_assert_eq!(id, EventId(slot as u64));
            let due = s.due_tick(id).expect("just scheduled").0;
            expected.push((due, id));
        }
        for (slot, cancel) in cancel_mask.iter().enumerate().take(durations.len()) {
            if *cancel {
                prop_assert!(s.cancel(EventId(slot as u64)));
            }
        }
        expected.retain(|&(_, id)| !cancel_mask[id.0 as usize]);
        expected.sort();

        for _ in 0..40 {
            s.tick(&mut fired, FRAME);
        }
        prop_assert_eq!(fired, expected);
        prop_assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn at_most_one_fire_per_event(
        durations in prop::collection::vec(0u64..100, 1..20),
        frames in prop::collection::vec(1u64..80, 30),
    ) {
        let mut s = scheduler();
        let mut fired = Fired::new();
        for (slot, ms) in durations.iter().enumerate() {
            s.schedule(*ms, record(slot as u64));
        }
        for ms in frames {
            s.tick(&mut fired, Duration::from_millis(ms));
        }
        let mut ids: Vec<EventId> = fired.iter().map(|&(_, id)| id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }
}
