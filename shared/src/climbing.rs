/*!
Hand-based climbing controller.

Per-hand grab/drop state machine that derives locomotion velocity from
attachment motion. A grab binds the hand to a point expressed in the
grabbed surface's local frame; every late tick the anchor is recomposed
against the surface's current pose, so moving surfaces carry the hand.

Velocity model (two input modalities):
- VR: the stored release velocity is `(anchor - tracked hand) / dt`, the
  same pull velocity applied while climbing.
- Desktop: the stored release velocity tracks the anchor's own motion
  between ticks, with excess horizontal speed damped toward zero while
  the vertical component is kept intact (head-look jitter should not turn
  into lateral flings, but vertical climbing feel must survive).

The controller never talks to the host directly: it pushes typed
[`ClimbEvent`]s into a caller-owned buffer and exposes the velocity to
apply through [`ClimbingController::take_velocity_command`]. Run
[`ClimbingController::update_grab`] in the late pass, after movement
integration, so it reads post-physics poses.
*/

use nalgebra as na;

use crate::constants::{
    DEFAULT_HAND_RADIUS, DEFAULT_HAND_REACH, DEFAULT_LATERAL_SMOOTHING,
    DEFAULT_LATERAL_SPEED_THRESHOLD, DEFAULT_SURFACE_CLEARANCE, DEFAULT_WALLJUMP_STRENGTH,
    DIST_EPS,
};
use crate::events::ClimbEvent;
use crate::surface::{SurfaceId, SurfaceSet};
use crate::types::Vec3;

/// A physical hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    #[inline]
    pub fn other(self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

/// Tracked poses for one tick: head and both hands, world space.
///
/// On desktop rigs the "hands" are fixed anchors on the player body; the
/// controller does not care where the values come from.
#[derive(Clone, Copy, Debug)]
pub struct TrackingFrame {
    pub head_position: Vec3,
    pub head_forward: Vec3,
    pub left_hand: Vec3,
    pub right_hand: Vec3,
}

impl TrackingFrame {
    #[inline]
    pub fn hand(&self, hand: Hand) -> Vec3 {
        match hand {
            Hand::Left => self.left_hand,
            Hand::Right => self.right_hand,
        }
    }
}

/// Which direction a VR wall-jump blends toward (desktop always uses the
/// head forward).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalljumpReference {
    HeadForward,
    /// From the non-climbing hand toward the head.
    OffHandToHead,
}

/// Climbing tuning, loaded once and immutable at runtime.
#[derive(Clone, Copy, Debug)]
pub struct ClimbConfig {
    /// Layer mask a grab probe may latch onto.
    pub climbable_mask: u32,
    pub walljump_enabled: bool,
    /// Impulse magnitude added to the release velocity (m/s).
    pub walljump_strength: f32,
    /// 0 = straight up, 1 = fully along the reference direction.
    pub walljump_direction_blend: f32,
    pub walljump_reference: WalljumpReference,
    /// VR: grab with the grip button (press-to-toggle) instead of the
    /// trigger (hold).
    pub use_grab_button: bool,
    /// VR hand probe radius (meters).
    pub hand_radius: f32,
    /// Desktop head-ray reach (meters).
    pub hand_reach: f32,
    /// Offset along the hit normal for desktop attach points (meters).
    pub surface_clearance: f32,
    /// Planar speed above which desktop release velocity gets damped (m/s).
    pub lateral_speed_threshold: f32,
    /// Divisor turning planar speed into the damping blend (clamped to [0,1]).
    pub lateral_smoothing: f32,
    /// Whether grab/drop notifications should be routed to the climbed
    /// surface's own listeners (global listeners always receive them).
    pub notify_climbed_surfaces: bool,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            climbable_mask: 1,
            walljump_enabled: true,
            walljump_strength: DEFAULT_WALLJUMP_STRENGTH,
            walljump_direction_blend: 0.0,
            walljump_reference: WalljumpReference::HeadForward,
            use_grab_button: true,
            hand_radius: DEFAULT_HAND_RADIUS,
            hand_reach: DEFAULT_HAND_REACH,
            surface_clearance: DEFAULT_SURFACE_CLEARANCE,
            lateral_speed_threshold: DEFAULT_LATERAL_SPEED_THRESHOLD,
            lateral_smoothing: DEFAULT_LATERAL_SMOOTHING,
            notify_climbed_surfaces: true,
        }
    }
}

/// A live attachment: which surface, and where on it (local frame).
#[derive(Clone, Copy, Debug)]
pub struct Attachment {
    pub surface: SurfaceId,
    /// Attach point in the surface's local frame.
    pub local_point: Vec3,
}

/// Mutable state for one hand. Rest state is detached.
#[derive(Clone, Copy, Debug)]
pub struct HandState {
    pub attachment: Option<Attachment>,
    /// World position of the attach anchor last tick (velocity baseline).
    pub last_anchor: Vec3,
    /// Velocity handed to locomotion when this hand lets go.
    pub last_velocity: Vec3,
}

impl Default for HandState {
    fn default() -> Self {
        Self {
            attachment: None,
            last_anchor: Vec3::zeros(),
            last_velocity: Vec3::zeros(),
        }
    }
}

impl HandState {
    #[inline]
    pub fn attached(&self) -> bool {
        self.attachment.is_some()
    }
}

/// The per-player climbing state machine.
pub struct ClimbingController {
    config: ClimbConfig,
    in_vr: bool,
    hands: [HandState; 2],
    /// The hand driving locomotion: the most recent successful grab. A
    /// grab by the other hand supersedes it (the old surface is dropped).
    active: Option<Hand>,
    velocity_command: Option<Vec3>,
}

impl ClimbingController {
    pub fn new(config: ClimbConfig, in_vr: bool) -> Self {
        Self {
            config,
            in_vr,
            hands: [HandState::default(), HandState::default()],
            active: None,
            velocity_command: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &ClimbConfig {
        &self.config
    }

    #[inline]
    pub fn hand(&self, hand: Hand) -> &HandState {
        &self.hands[hand.index()]
    }

    #[inline]
    pub fn is_climbing(&self) -> bool {
        self.active.is_some()
    }

    /// Is `hand` the hand currently climbing?
    #[inline]
    pub fn is_climbing_with(&self, hand: Hand) -> bool {
        self.active == Some(hand) && self.hands[hand.index()].attached()
    }

    /// Is the player currently attached to this surface?
    pub fn is_grabbing(&self, surface: SurfaceId) -> bool {
        self.active
            .and_then(|h| self.hands[h.index()].attachment)
            .is_some_and(|a| a.surface == surface)
    }

    /// Velocity the host should apply to the player's locomotion this
    /// tick, if any. Consumed on read.
    pub fn take_velocity_command(&mut self) -> Option<Vec3> {
        self.velocity_command.take()
    }

    // ---- input routing ----

    /// Jump edge. While climbing with wall-jump enabled, a press lets go
    /// with an extra impulse blended between straight-up and the
    /// configured reference direction.
    pub fn input_jump(
        &mut self,
        pressed: bool,
        tracking: &TrackingFrame,
        events: &mut Vec<ClimbEvent>,
    ) {
        if !pressed || !self.config.walljump_enabled || !self.is_climbing() {
            return;
        }

        let impulse = self.walljump_direction(tracking) * self.config.walljump_strength;
        if let Some(active) = self.active {
            self.hands[active.index()].last_velocity += impulse;
        }
        self.release(events);
    }

    /// Use edge (trigger in VR, left click on desktop).
    ///
    /// Desktop always routes this to the left hand. In VR it only acts in
    /// trigger mode; grip mode ignores it.
    pub fn input_use(
        &mut self,
        pressed: bool,
        hand: Hand,
        tracking: &TrackingFrame,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) {
        if self.in_vr {
            if self.config.use_grab_button {
                return;
            }
            self.process_input(pressed, hand, tracking, surfaces, events);
        } else {
            self.process_input(pressed, Hand::Left, tracking, surfaces, events);
        }
    }

    /// Grab edge (grip button). VR-only, and only in grip mode.
    ///
    /// Grip mode routes press edges only: a press with a free hand grabs,
    /// a press with the climbing hand releases. Release edges are ignored
    /// so relaxing the grip mid-climb does not drop the player.
    pub fn input_grab(
        &mut self,
        pressed: bool,
        hand: Hand,
        tracking: &TrackingFrame,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) {
        if !self.in_vr || !self.config.use_grab_button {
            return;
        }
        if !pressed {
            return;
        }
        if self.is_climbing_with(hand) {
            self.release(events);
        } else {
            self.process_input(true, hand, tracking, surfaces, events);
        }
    }

    /// Drop edge (right click). Desktop-only, always the right hand.
    pub fn input_drop(
        &mut self,
        pressed: bool,
        tracking: &TrackingFrame,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) {
        if self.in_vr {
            log::error!("drop input received in VR; the climbing controller does not handle it");
            return;
        }
        self.process_input(pressed, Hand::Right, tracking, surfaces, events);
    }

    /// Shared edge handling: a press with a non-climbing hand attempts a
    /// grab, a release of the climbing hand lets go. Everything else is a
    /// no-op.
    fn process_input(
        &mut self,
        pressed: bool,
        hand: Hand,
        tracking: &TrackingFrame,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) {
        if pressed && !self.is_climbing_with(hand) {
            // A failed probe simply leaves state unchanged.
            self.try_grab(hand, tracking, surfaces, events);
        }
        if !pressed && self.is_climbing_with(hand) {
            self.release(events);
        }
    }

    // ---- climbing actions ----

    /// Probe for a surface at `hand` and attach on success.
    fn try_grab(
        &mut self,
        hand: Hand,
        tracking: &TrackingFrame,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) -> bool {
        let acquired = if self.in_vr {
            surfaces
                .probe_sphere(
                    tracking.hand(hand),
                    self.config.hand_radius,
                    self.config.climbable_mask,
                )
                .map(|hit| (hit.surface, hit.point))
        } else {
            surfaces
                .probe_ray(
                    tracking.head_position,
                    tracking.head_forward,
                    self.config.hand_reach,
                    self.config.climbable_mask,
                )
                .map(|hit| (hit.surface, hit.point + hit.normal * self.config.surface_clearance))
        };

        let Some((surface, anchor)) = acquired else {
            return false;
        };
        self.grab_at(hand, surface, anchor, surfaces, events);
        true
    }

    /// Attach `hand` to `surface` at a caller-supplied local-frame offset,
    /// skipping the probe. For interactables that place the hand on
    /// themselves.
    pub fn force_grab(
        &mut self,
        hand: Hand,
        surface: SurfaceId,
        local_offset: Vec3,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) {
        let Some(surface_ref) = surfaces.get(surface) else {
            log::error!("force grab on unknown surface {surface}");
            return;
        };
        let anchor = surface_ref.transform.world_point(local_offset);
        self.grab_at(hand, surface, anchor, surfaces, events);
    }

    fn grab_at(
        &mut self,
        hand: Hand,
        surface: SurfaceId,
        anchor_world: Vec3,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) {
        let Some(surface_ref) = surfaces.get(surface) else {
            return;
        };
        let local_point = surface_ref.transform.local_point(anchor_world);

        // Fresh velocity integration baseline for the grabbing hand.
        let idx = hand.index();
        self.hands[idx].last_velocity = Vec3::zeros();
        self.hands[idx].last_anchor = anchor_world;

        // An existing attachment is superseded: its surface gets the drop
        // notification before the new grab fires, and the superseded hand
        // detaches without handing its velocity to locomotion.
        if let Some(prev) = self.active {
            if let Some(att) = self.hands[prev.index()].attachment.take() {
                events.push(ClimbEvent::Dropped {
                    surface: att.surface,
                });
            }
        }
        events.push(ClimbEvent::Grabbed { surface });

        self.hands[idx].attachment = Some(Attachment {
            surface,
            local_point,
        });
        self.active = Some(hand);
    }

    /// Let go of whatever the climbing hand holds, handing the stored
    /// velocity to locomotion. No-op while detached.
    pub fn release(&mut self, events: &mut Vec<ClimbEvent>) {
        let Some(active) = self.active.take() else {
            return;
        };
        let idx = active.index();
        let Some(att) = self.hands[idx].attachment.take() else {
            return;
        };

        self.velocity_command = Some(self.hands[idx].last_velocity);
        events.push(ClimbEvent::Dropped {
            surface: att.surface,
        });
    }

    /// Let go only if currently attached to `surface`. Idempotent.
    pub fn release_surface(&mut self, surface: SurfaceId, events: &mut Vec<ClimbEvent>) {
        if self.is_grabbing(surface) {
            self.release(events);
        }
    }

    /// Continuous-grab recomputation. Run once per tick in the late pass,
    /// after movement integration, so surface poses are current.
    pub fn update_grab(
        &mut self,
        dt: f32,
        tracking: &TrackingFrame,
        surfaces: &SurfaceSet,
        events: &mut Vec<ClimbEvent>,
    ) {
        let Some(active) = self.active else {
            return;
        };
        if dt <= 0.0 {
            return;
        }
        let idx = active.index();
        let Some(att) = self.hands[idx].attachment else {
            return;
        };

        let Some(surface) = surfaces.get(att.surface) else {
            // The surface disappeared from under the hand; let go with
            // whatever velocity was stored so far.
            log::warn!("climbed surface {} vanished, releasing", att.surface);
            self.release(events);
            return;
        };

        let anchor = surface.transform.world_point(att.local_point);
        let offset = anchor - tracking.hand(active);
        let velocity = offset / dt;

        if self.in_vr {
            self.hands[idx].last_velocity = velocity;
        } else {
            let anchor_velocity = (anchor - self.hands[idx].last_anchor) / dt;
            self.hands[idx].last_velocity = self.smooth_lateral(anchor_velocity);
        }
        self.hands[idx].last_anchor = anchor;

        self.velocity_command = Some(velocity);
    }

    /// Damp excess horizontal speed toward zero, keeping the vertical
    /// component intact. The blend factor is clamped to [0, 1] so large
    /// speeds can zero the planar part but never overshoot it.
    fn smooth_lateral(&self, v: Vec3) -> Vec3 {
        if self.config.lateral_smoothing <= 0.0 {
            return v;
        }
        let planar = Vec3::new(v.x, 0.0, v.z);
        let speed = planar.norm();
        if speed <= self.config.lateral_speed_threshold {
            return v;
        }
        let blend = (speed / self.config.lateral_smoothing).clamp(0.0, 1.0);
        let damped = planar * (1.0 - blend);
        Vec3::new(damped.x, v.y, damped.z)
    }

    /// Wall-jump direction: straight-up blended toward a reference
    /// direction. Degenerate blends fall back to straight up.
    fn walljump_direction(&self, tracking: &TrackingFrame) -> Vec3 {
        let up = Vec3::y();

        let raw_reference = if !self.in_vr {
            tracking.head_forward
        } else {
            match self.config.walljump_reference {
                WalljumpReference::HeadForward => tracking.head_forward,
                WalljumpReference::OffHandToHead => {
                    let off_hand = self.active.map(Hand::other).unwrap_or(Hand::Left);
                    tracking.head_position - tracking.hand(off_hand)
                }
            }
        };
        let reference = na::Unit::try_new(raw_reference, DIST_EPS)
            .map(|u| u.into_inner())
            .unwrap_or(up);

        let blend = self.config.walljump_direction_blend.clamp(0.0, 1.0);
        na::Unit::try_new(up.lerp(&reference, blend), DIST_EPS)
            .map(|u| u.into_inner())
            .unwrap_or(up)
    }
}
