//! Calloop runtime adapter
//!
//! Binds the engine to a real event loop: contact events arrive over a
//! calloop channel, and the long-press deadline is serviced by a
//! cancellable timer source. After every engine call the armed timer is
//! reconciled against the engine's pending deadline, so cancellation is
//! synchronous with the event that caused it; a stale wakeup that races
//! past reconciliation finds nothing armed in the engine and is a no-op.

use std::time::Duration;

use anyhow::Result;
use calloop::{
    channel::{self, Sender},
    timer::{TimeoutAction, Timer},
    EventLoop, LoopHandle, LoopSignal, RegistrationToken,
};
use tracing::{debug, warn};

use crate::clock::EngineClock;
use crate::input::{ContactEvent, GestureEngine};

struct RuntimeState {
    engine: GestureEngine,
    clock: EngineClock,
    loop_handle: LoopHandle<'static, RuntimeState>,
    signal: LoopSignal,
    timer_token: Option<RegistrationToken>,
    armed_deadline_ms: Option<u64>,
}

/// Event loop driving a [`GestureEngine`]
///
/// Runs until every [`Sender`] handed out by [`GestureRuntime::new`] has
/// been dropped and the queued events are drained.
pub struct GestureRuntime {
    event_loop: EventLoop<'static, RuntimeState>,
    state: RuntimeState,
}

impl GestureRuntime {
    /// Build a runtime around an engine, returning the contact-event sender
    pub fn new(engine: GestureEngine) -> Result<(Self, Sender<ContactEvent>)> {
        let event_loop: EventLoop<'static, RuntimeState> = EventLoop::try_new()?;
        let loop_handle = event_loop.handle();
        let signal = event_loop.get_signal();

        let (sender, channel) = channel::channel();
        loop_handle
            .insert_source(channel, |event, _, state: &mut RuntimeState| match event {
                channel::Event::Msg(contact_event) => {
                    state.engine.handle_event(contact_event);
                    sync_long_press_timer(state);
                }
                channel::Event::Closed => {
                    debug!("contact channel closed, stopping runtime");
                    state.signal.stop();
                }
            })
            .map_err(|e| anyhow::anyhow!("failed to insert contact channel source: {}", e.error))?;

        let state = RuntimeState {
            engine,
            clock: EngineClock::start(),
            loop_handle,
            signal,
            timer_token: None,
            armed_deadline_ms: None,
        };

        Ok((Self { event_loop, state }, sender))
    }

    /// The clock event sources should stamp timestamps with
    pub fn clock(&self) -> EngineClock {
        self.state.clock
    }

    /// Run until the contact channel closes
    pub fn run(mut self) -> Result<()> {
        self.event_loop
            .run(None::<Duration>, &mut self.state, |_| {})?;
        Ok(())
    }
}

/// Reconcile the host timer with the engine's pending long-press deadline
fn sync_long_press_timer(state: &mut RuntimeState) {
    let pending = state.engine.pending_long_press_ms();
    if pending == state.armed_deadline_ms {
        return;
    }

    if let Some(token) = state.timer_token.take() {
        state.loop_handle.remove(token);
    }
    state.armed_deadline_ms = None;

    let Some(deadline_ms) = pending else {
        return;
    };

    let delay = deadline_ms.saturating_sub(state.clock.now_ms());
    let timer = Timer::from_duration(Duration::from_millis(delay));
    match state.loop_handle.insert_source(timer, move |_, _, state| {
        state.engine.handle_timeout(state.clock.now_ms());
        if let Some(next_ms) = state.engine.pending_long_press_ms() {
            // Woke a shade early; keep the source until the deadline.
            state.armed_deadline_ms = Some(next_ms);
            let wait = next_ms.saturating_sub(state.clock.now_ms()).max(1);
            TimeoutAction::ToDuration(Duration::from_millis(wait))
        } else {
            state.timer_token = None;
            state.armed_deadline_ms = None;
            TimeoutAction::Drop
        }
    }) {
        Ok(token) => {
            state.timer_token = Some(token);
            state.armed_deadline_ms = Some(deadline_ms);
        }
        Err(e) => warn!("failed to insert long-press timer source: {}", e.error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::input::{GestureHandlers, Point};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::thread;

    #[test]
    fn test_runtime_recognizes_tap_end_to_end() {
        let taps = Rc::new(RefCell::new(Vec::new()));
        let t = taps.clone();
        let handlers = GestureHandlers {
            on_tap: Some(Box::new(move |position| {
                t.borrow_mut().push(position);
            })),
            ..Default::default()
        };
        let engine = GestureEngine::new(EngineConfig::default(), handlers);
        let (runtime, sender) = GestureRuntime::new(engine).unwrap();
        let clock = runtime.clock();

        let feeder = thread::spawn(move || {
            sender
                .send(ContactEvent::Down {
                    position: Point::new(5.0, 5.0),
                    time_ms: clock.now_ms(),
                })
                .unwrap();
            thread::sleep(Duration::from_millis(30));
            sender
                .send(ContactEvent::Up {
                    time_ms: clock.now_ms(),
                })
                .unwrap();
        });

        runtime.run().unwrap();
        feeder.join().unwrap();
        assert_eq!(taps.borrow().as_slice(), &[Point::new(5.0, 5.0)]);
    }

    #[test]
    fn test_runtime_fires_long_press_through_timer() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let l2 = log.clone();
        let handlers = GestureHandlers {
            on_long_press: Some(Box::new(move |_| {
                l.borrow_mut().push("long_press");
            })),
            on_tap: Some(Box::new(move |_| {
                l2.borrow_mut().push("tap");
            })),
            ..Default::default()
        };
        let config = EngineConfig {
            long_press_delay_ms: 80,
            ..Default::default()
        };
        let engine = GestureEngine::new(config, handlers);
        let (runtime, sender) = GestureRuntime::new(engine).unwrap();
        let clock = runtime.clock();

        let feeder = thread::spawn(move || {
            sender
                .send(ContactEvent::Down {
                    position: Point::new(0.0, 0.0),
                    time_ms: clock.now_ms(),
                })
                .unwrap();
            // Hold well past the delay so the timer fires mid-contact.
            thread::sleep(Duration::from_millis(300));
            sender
                .send(ContactEvent::Up {
                    time_ms: clock.now_ms(),
                })
                .unwrap();
        });

        runtime.run().unwrap();
        feeder.join().unwrap();
        // Long-press fired once, and the quiet end did not add a tap.
        assert_eq!(log.borrow().as_slice(), &["long_press"]);
    }

    #[test]
    fn test_runtime_movement_cancels_timer() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let handlers = GestureHandlers {
            on_long_press: Some(Box::new(move |_| {
                l.borrow_mut().push("long_press");
            })),
            ..Default::default()
        };
        let config = EngineConfig {
            long_press_delay_ms: 80,
            ..Default::default()
        };
        let engine = GestureEngine::new(config, handlers);
        let (runtime, sender) = GestureRuntime::new(engine).unwrap();
        let clock = runtime.clock();

        let feeder = thread::spawn(move || {
            sender
                .send(ContactEvent::Down {
                    position: Point::new(0.0, 0.0),
                    time_ms: clock.now_ms(),
                })
                .unwrap();
            thread::sleep(Duration::from_millis(20));
            sender
                .send(ContactEvent::Motion {
                    position: Point::new(40.0, 0.0),
                    time_ms: clock.now_ms(),
                })
                .unwrap();
            thread::sleep(Duration::from_millis(300));
            sender
                .send(ContactEvent::Up {
                    time_ms: clock.now_ms(),
                })
                .unwrap();
        });

        runtime.run().unwrap();
        feeder.join().unwrap();
        assert!(log.borrow().is_empty());
    }
}
