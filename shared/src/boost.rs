/*!
Boost sequencer: a state machine advancing a normalized time value across
a baked path.

The cycle is `Idle -> PreCooldown -> Boosting -> PostCooldown -> Rewinding
-> Idle`. Traversal rates are expressed in normalized time per second
(`speed / path length`), so the host feeds the current time straight into
[`BakedPath::place`](crate::curve::BakedPath::place) every tick the
sequencer is active.

Notifications are pushed into a caller-owned buffer, at most once per
transition. The sequencer owns no feedback or network state of its own;
cancelling from any phase is safe and idempotent.
*/

use crate::constants::{
    DEFAULT_BOOST_SPEED, DEFAULT_REWIND_SPEED, DEFAULT_START_DELAY, DEFAULT_STOP_DELAY, DIST_EPS,
};
use crate::events::{BoostEvent, Feedback};

/// Sequencer phase. The explicit discriminants mirror the wire/state
/// codes used by hosts that persist or replicate the phase; do not
/// reorder or reuse values.
#[repr(i8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoostPhase {
    Idle = -1,
    PreCooldown = 0,
    Boosting = 1,
    PostCooldown = 2,
    Rewinding = 3,
}

/// Boost tuning, loaded once and immutable at runtime.
#[derive(Clone, Copy, Debug)]
pub struct BoostConfig {
    /// Delay between the start trigger and the boost phase (seconds).
    pub start_delay: f32,
    /// Delay between the end of the boost and the rewind (seconds).
    pub stop_delay: f32,
    /// Traversal speed while boosting (m/s along the baked path).
    pub boost_speed: f32,
    /// Traversal speed while rewinding (m/s along the baked path).
    pub rewind_speed: f32,
    /// Force-release a hand climbing the boosted handle when the cycle
    /// starts.
    pub force_drop_on_start: bool,
    /// Force-release it when the boost phase stops.
    pub force_drop_on_stop: bool,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            start_delay: DEFAULT_START_DELAY,
            stop_delay: DEFAULT_STOP_DELAY,
            boost_speed: DEFAULT_BOOST_SPEED,
            rewind_speed: DEFAULT_REWIND_SPEED,
            force_drop_on_start: false,
            force_drop_on_stop: true,
        }
    }
}

/// One boost cycle over one baked path.
pub struct Booster {
    config: BoostConfig,
    phase: BoostPhase,
    /// Normalized position along the path, kept in [0, 1].
    time: f32,
    cooldown: f32,
    /// Normalized-time rates (per second). 0 marks a degenerate path; a
    /// non-positive rate completes its phase on the next tick so no state
    /// can stall.
    boost_rate: f32,
    rewind_rate: f32,
}

impl Booster {
    /// Build a sequencer for a path of the given (piecewise) length.
    ///
    /// A zero-length path cannot yield a finite traversal rate; it is
    /// flagged and both phases then complete in a single tick instead of
    /// dividing by zero.
    pub fn new(config: BoostConfig, path_length: f32) -> Self {
        let (boost_rate, rewind_rate) = if path_length <= DIST_EPS {
            if config.boost_speed > 0.0 || config.rewind_speed > 0.0 {
                log::warn!("booster path has no length; traversal completes immediately");
            }
            (0.0, 0.0)
        } else {
            (
                config.boost_speed / path_length,
                config.rewind_speed / path_length,
            )
        };

        Self {
            config,
            phase: BoostPhase::Idle,
            time: 0.0,
            cooldown: 0.0,
            boost_rate,
            rewind_rate,
        }
    }

    #[inline]
    pub fn config(&self) -> &BoostConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> BoostPhase {
        self.phase
    }

    /// Normalized time along the path, in [0, 1].
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// True while the cycle is running (the host should re-place the
    /// boosted object every tick this holds).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase != BoostPhase::Idle
    }

    /// External start trigger. Only accepted while `Idle`; anything else
    /// is a no-op. Resets normalized time to 0 and enters the
    /// pre-boost cooldown.
    pub fn start(&mut self, events: &mut Vec<BoostEvent>) {
        if self.phase != BoostPhase::Idle {
            return;
        }
        self.set_phase(BoostPhase::PreCooldown, events);
        self.time = 0.0;
        events.push(BoostEvent::Started);
    }

    /// Advance the cycle by `dt` seconds. No-op while `Idle`.
    pub fn advance(&mut self, dt: f32, events: &mut Vec<BoostEvent>) {
        match self.phase {
            BoostPhase::Idle => {}

            BoostPhase::PreCooldown | BoostPhase::PostCooldown => {
                self.cooldown -= dt;
                if self.cooldown <= 0.0 {
                    self.next_phase(events);
                }
            }

            BoostPhase::Boosting => {
                if self.boost_rate <= 0.0 {
                    self.time = 1.0;
                } else {
                    self.time += self.boost_rate * dt;
                }
                if self.time >= 1.0 {
                    // Skip cleanly over any remaining delta.
                    self.time = 1.0;
                    self.stop(events);
                }
            }

            BoostPhase::Rewinding => {
                if self.rewind_rate <= 0.0 {
                    self.time = 0.0;
                } else {
                    self.time -= self.rewind_rate * dt;
                }
                if self.time <= 0.0 {
                    self.time = 0.0;
                    self.phase = BoostPhase::Idle;
                }
            }
        }
    }

    /// Force the cycle back to `Idle` from any phase (external drop
    /// request). Safe to call repeatedly; only stops the boost-loop
    /// feedback if it was running.
    pub fn cancel(&mut self, events: &mut Vec<BoostEvent>) {
        if self.phase == BoostPhase::Idle {
            return;
        }
        if self.phase == BoostPhase::Boosting {
            events.push(BoostEvent::FeedbackStopped(Feedback::BoostLoop));
        }
        self.phase = BoostPhase::Idle;
        self.time = 0.0;
        self.cooldown = 0.0;
    }

    /// End the boost phase: clamp to the end of the path and enter the
    /// post-boost cooldown.
    fn stop(&mut self, events: &mut Vec<BoostEvent>) {
        self.set_phase(BoostPhase::PostCooldown, events);
        events.push(BoostEvent::Stopped);
    }

    fn next_phase(&mut self, events: &mut Vec<BoostEvent>) {
        match self.phase {
            BoostPhase::PreCooldown => self.set_phase(BoostPhase::Boosting, events),
            BoostPhase::PostCooldown => self.set_phase(BoostPhase::Rewinding, events),
            _ => self.set_phase(BoostPhase::Idle, events),
        }
    }

    /// Phase entry side effects (cooldown arming, feedback edges). Each
    /// fires at most once per transition.
    fn set_phase(&mut self, phase: BoostPhase, events: &mut Vec<BoostEvent>) {
        match phase {
            BoostPhase::PreCooldown => {
                self.cooldown = self.config.start_delay;
                events.push(BoostEvent::FeedbackStarted(Feedback::StartImpulse));
            }
            BoostPhase::Boosting => {
                events.push(BoostEvent::FeedbackStarted(Feedback::BoostLoop));
            }
            BoostPhase::PostCooldown => {
                self.cooldown = self.config.stop_delay;
                events.push(BoostEvent::FeedbackStopped(Feedback::BoostLoop));
                events.push(BoostEvent::FeedbackStarted(Feedback::StopImpulse));
            }
            BoostPhase::Rewinding | BoostPhase::Idle => {}
        }
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dt of 0.25 s is exactly representable, so the phase timings below
    /// are exact tick counts, not approximations.
    const DT: f32 = 0.25;

    fn booster() -> Booster {
        // 10 m path, 10 m/s boost, 5 m/s rewind, 1 s cooldowns:
        // 4 ticks per cooldown, 4 ticks boosting, 8 ticks rewinding.
        Booster::new(BoostConfig::default(), 10.0)
    }

    /// Tick until the phase changes, returning how many ticks it took.
    fn ticks_until(b: &mut Booster, phase: BoostPhase, events: &mut Vec<BoostEvent>) -> usize {
        for tick in 1..=64 {
            b.advance(DT, events);
            if b.phase() == phase {
                return tick;
            }
        }
        panic!("never reached {phase:?}");
    }

    #[test]
    fn full_cycle_timing() {
        let mut b = booster();
        let mut events = Vec::new();

        assert_eq!(b.phase(), BoostPhase::Idle);
        b.start(&mut events);
        assert_eq!(b.phase(), BoostPhase::PreCooldown);
        assert_eq!(b.time(), 0.0);

        // 1 s start delay.
        assert_eq!(ticks_until(&mut b, BoostPhase::Boosting, &mut events), 4);
        // 10 m at 10 m/s.
        assert_eq!(ticks_until(&mut b, BoostPhase::PostCooldown, &mut events), 4);
        assert_eq!(b.time(), 1.0);
        // 1 s stop delay.
        assert_eq!(ticks_until(&mut b, BoostPhase::Rewinding, &mut events), 4);
        // 10 m back at 5 m/s.
        assert_eq!(ticks_until(&mut b, BoostPhase::Idle, &mut events), 8);
        assert_eq!(b.time(), 0.0);
    }

    #[test]
    fn cycle_emits_each_notification_once_in_order() {
        let mut b = booster();
        let mut events = Vec::new();

        b.start(&mut events);
        for _ in 0..32 {
            b.advance(DT, &mut events);
        }
        assert_eq!(b.phase(), BoostPhase::Idle);

        assert_eq!(
            events,
            vec![
                BoostEvent::FeedbackStarted(Feedback::StartImpulse),
                BoostEvent::Started,
                BoostEvent::FeedbackStarted(Feedback::BoostLoop),
                BoostEvent::FeedbackStopped(Feedback::BoostLoop),
                BoostEvent::FeedbackStarted(Feedback::StopImpulse),
                BoostEvent::Stopped,
            ]
        );
    }

    #[test]
    fn start_is_only_accepted_while_idle() {
        let mut b = booster();
        let mut events = Vec::new();

        b.start(&mut events);
        let after_first = events.len();

        // Re-triggering mid-cycle changes nothing.
        b.start(&mut events);
        b.advance(DT, &mut events);
        b.start(&mut events);

        assert_eq!(events.len(), after_first);
        assert_eq!(b.phase(), BoostPhase::PreCooldown);
    }

    #[test]
    fn advance_while_idle_is_a_noop() {
        let mut b = booster();
        let mut events = Vec::new();

        b.advance(DT, &mut events);

        assert_eq!(b.phase(), BoostPhase::Idle);
        assert!(events.is_empty());
    }

    #[test]
    fn overshooting_the_end_clamps_time_to_one() {
        let mut b = booster();
        let mut events = Vec::new();

        b.start(&mut events);
        ticks_until(&mut b, BoostPhase::Boosting, &mut events);

        // A single huge step lands exactly on the end of the path.
        b.advance(30.0, &mut events);
        assert_eq!(b.phase(), BoostPhase::PostCooldown);
        assert_eq!(b.time(), 1.0);
    }

    #[test]
    fn cancel_is_idempotent_and_stops_the_loop_feedback() {
        let mut b = booster();
        let mut events = Vec::new();

        b.start(&mut events);
        ticks_until(&mut b, BoostPhase::Boosting, &mut events);
        events.clear();

        b.cancel(&mut events);
        assert_eq!(b.phase(), BoostPhase::Idle);
        assert_eq!(b.time(), 0.0);
        assert_eq!(
            events,
            vec![BoostEvent::FeedbackStopped(Feedback::BoostLoop)]
        );

        // Cancelling again does nothing.
        b.cancel(&mut events);
        assert_eq!(events.len(), 1);

        // The sequencer is reusable after a cancel.
        b.start(&mut events);
        assert_eq!(b.phase(), BoostPhase::PreCooldown);
    }

    #[test]
    fn cancel_outside_the_boost_phase_has_no_feedback_to_stop() {
        let mut b = booster();
        let mut events = Vec::new();

        b.start(&mut events);
        events.clear();

        b.cancel(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn zero_length_path_never_divides_or_stalls() {
        let mut b = Booster::new(BoostConfig::default(), 0.0);
        let mut events = Vec::new();

        b.start(&mut events);
        for _ in 0..16 {
            b.advance(DT, &mut events);
            assert!(b.time().is_finite());
        }

        // The degenerate path still completes the whole cycle.
        assert_eq!(b.phase(), BoostPhase::Idle);
        assert_eq!(b.time(), 0.0);
    }
}
