pub mod boost;
pub mod climbing;
pub mod constants;
pub mod curve;
pub mod events;
pub mod surface;
pub mod types;

pub use boost::{BoostConfig, BoostPhase, Booster};
pub use climbing::{
    Attachment, ClimbConfig, ClimbingController, Hand, HandState, TrackingFrame,
    WalljumpReference,
};
pub use curve::{BakedPath, Curve, PathPose};
pub use events::{BoostEvent, ClimbEvent, Feedback};
pub use surface::{ClimbSurface, OverlapHit, RayHit, SurfaceId, SurfaceSet, SurfaceShape};
pub use types::{Iso, Quat, Transform, Vec3};
