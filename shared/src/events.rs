/*!
Typed notifications raised by the climbing controller and boost sequencer.

This is a closed set resolved at compile time, replacing dispatch of
events by string name to a target behavior. Delivery is fire-and-forget
and at-most-once per transition: state machines push into a caller-owned
buffer during their tick and the host drains it afterwards. Dropping the
buffer contents must never affect simulation state.
*/

use crate::surface::SurfaceId;

/// Notifications from the climbing controller.
///
/// Ordering guarantee: when a hand switches surfaces within one tick, the
/// `Dropped` for the old surface is pushed before the `Grabbed` for the
/// new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClimbEvent {
    /// A hand attached to the given surface.
    Grabbed { surface: SurfaceId },
    /// The attachment to the given surface was released.
    Dropped { surface: SurfaceId },
}

/// Feedback channels driven by the boost sequencer.
///
/// What a channel plays (particles, animator triggers, audio) is the
/// host's concern; the sequencer only reports start/stop edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// One-shot feedback fired when the boost cycle begins.
    StartImpulse,
    /// One-shot feedback fired when the boost phase ends.
    StopImpulse,
    /// Looping feedback active for the duration of the boost phase.
    BoostLoop,
}

/// Notifications from the boost sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoostEvent {
    /// The boost cycle was entered. This is the one notification with
    /// session scope: a networked host broadcasts it to all peers so
    /// every client runs the same cycle locally.
    Started,
    /// The boost phase finished (the sequencer reached its post-boost
    /// cooldown).
    Stopped,
    /// A feedback channel should begin playing.
    FeedbackStarted(Feedback),
    /// A feedback channel should stop playing.
    FeedbackStopped(Feedback),
}
