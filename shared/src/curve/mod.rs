/*!
Parametric path curves and their baked form.

A path is declared as a [`Curve`] (pure data + closed-form evaluation),
baked once into a [`BakedPath`] polyline, and then sampled every frame
through [`BakedPath::place`]. The split keeps the per-frame cost at one
lerp regardless of the curve kind. The code is split for clarity:

- definition: the `Curve` sum type and kind-specific closed forms
- bake:       polyline sampling and piecewise arc length
- place:      normalized-time lookup producing a [`PathPose`]
*/

mod bake;
mod definition;
mod place;

pub use bake::BakedPath;
pub use definition::Curve;
pub use place::PathPose;
