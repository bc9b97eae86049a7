//! Completion broadcast: one owner, many independent subscribers, at most one
//! firing per play cycle. Waiters, chained callbacks, and the auto-destroy
//! hook all observe the same firing without consuming it from each other.

use crate::playback::TweenState;

struct Listener {
    once: bool,
    hook: Box<dyn FnMut(TweenState)>,
}

/// Single-fire-per-cycle notification carrying the terminal state.
#[derive(Default)]
pub struct CompletionSignal {
    listeners: Vec<Listener>,
    fired: Option<TweenState>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe for every future cycle's firing.
    pub fn subscribe<F: FnMut(TweenState) + 'static>(&mut self, hook: F) {
        self.listeners.push(Listener {
            once: false,
            hook: Box::new(hook),
        });
    }

    /// Subscribe for the next firing only; the listener is dropped after it
    /// runs.
    pub fn subscribe_once<F: FnMut(TweenState) + 'static>(&mut self, hook: F) {
        self.listeners.push(Listener {
            once: true,
            hook: Box::new(hook),
        });
    }

    /// Re-arm for a fresh play cycle.
    pub fn begin_cycle(&mut self) {
        self.fired = None;
    }

    /// Fire the terminal state. Returns false if this cycle already fired;
    /// listeners run in subscription order.
    pub fn fire(&mut self, state: TweenState) -> bool {
        if self.fired.is_some() {
            return false;
        }
        self.fired = Some(state);
        for listener in &mut self.listeners {
            (listener.hook)(state);
        }
        self.listeners.retain(|l| !l.once);
        true
    }

    /// The state this cycle fired with, if it has.
    #[inline]
    pub fn fired(&self) -> Option<TweenState> {
        self.fired
    }

    /// Drop every subscriber; used when the owning controller is destroyed.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn broadcast_reaches_every_listener_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = CompletionSignal::new();
        for tag in ["wait", "chained"] {
            let seen = seen.clone();
            signal.subscribe(move |state| seen.borrow_mut().push((tag, state)));
        }
        assert!(signal.fire(TweenState::Completed));
        assert!(!signal.fire(TweenState::Cancelled));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("wait", TweenState::Completed),
                ("chained", TweenState::Completed)
            ]
        );
        assert_eq!(signal.fired(), Some(TweenState::Completed));
    }

    #[test]
    fn once_listeners_drop_after_firing() {
        let hits = Rc::new(RefCell::new(0u32));
        let mut signal = CompletionSignal::new();
        let h = hits.clone();
        signal.subscribe_once(move |_| *h.borrow_mut() += 1);
        let h = hits.clone();
        signal.subscribe(move |_| *h.borrow_mut() += 1);

        signal.fire(TweenState::Completed);
        assert_eq!(signal.listener_count(), 1);

        signal.begin_cycle();
        assert_eq!(signal.fired(), None);
        signal.fire(TweenState::Cancelled);
        assert_eq!(*hits.borrow(), 3);
    }
}
