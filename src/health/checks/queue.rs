//! Pointer queue self-check

use crate::health::check::{CheckResult, SystemCheck};
use crate::input::{PointerEvent, PointerEventKind, PointerEventQueue, QUEUE_CAPACITY};

/// Exercises the ring buffer's capacity, ordering and overflow policy
#[derive(Default)]
pub struct QueueCheck;

impl QueueCheck {
    pub fn new() -> Self {
        Self
    }
}

impl SystemCheck for QueueCheck {
    fn name(&self) -> &'static str {
        "Pointer queue"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Fills the event ring past capacity and drains it")
    }

    fn check(&self) -> CheckResult {
        let queue = PointerEventQueue::new();
        let usable = QUEUE_CAPACITY - 1;
        let mut failures = Vec::new();

        for i in 0..=QUEUE_CAPACITY as i32 {
            queue.push(PointerEvent::new(i, -i, PointerEventKind::Move));
        }
        if queue.len() != usable {
            failures.push(format!("holds {} events, expected {usable}", queue.len()));
        }

        let drained: Vec<_> = std::iter::from_fn(|| queue.pop()).collect();
        let in_order = drained
            .iter()
            .enumerate()
            .all(|(i, event)| event.x == i as i32 && event.y == -(i as i32));
        if !in_order {
            failures.push("events came out of order".to_string());
        }
        if drained.len() != usable {
            failures.push(format!("drained {} events, expected {usable}", drained.len()));
        }
        if queue.pop().is_some() {
            failures.push("pop on an empty queue returned an event".to_string());
        }

        CheckResult::from_failures(
            format!("{usable} of {QUEUE_CAPACITY} slots usable, overflow drops newest"),
            failures,
        )
    }
}
