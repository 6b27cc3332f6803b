//! Planar geometry used by the cursor transfer logic.
//!
//! Pointer controllers report positions in the display panel's natural
//! (un-rotated) space, while display topology offsets are expressed in the
//! rotated logical space. [`Transform`] converts between the two.

use serde::{Deserialize, Serialize};

/// A 2-D vector or point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns `true` if either component is non-zero.
    pub fn is_nonzero(&self) -> bool {
        self.x.abs() > 0.0 || self.y.abs() > 0.0
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Physical rotation of a display relative to its natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

/// A 2-D affine transform.
///
/// Maps `(x, y)` to `(a·x + b·y + tx, c·x + d·y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    tx: f32,
    ty: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Builds the transform from a panel's natural coordinate space into the
    /// rotated logical space for the given orientation.
    ///
    /// `natural_width` and `natural_height` are the panel dimensions before
    /// rotation is applied.
    pub fn from_orientation(orientation: Orientation, natural_width: f32, natural_height: f32) -> Self {
        let (w, h) = (natural_width, natural_height);
        match orientation {
            Orientation::Rotation0 => Self::IDENTITY,
            Orientation::Rotation90 => Self::new(0.0, 1.0, -1.0, 0.0, 0.0, w),
            Orientation::Rotation180 => Self::new(-1.0, 0.0, 0.0, -1.0, w, h),
            Orientation::Rotation270 => Self::new(0.0, -1.0, 1.0, 0.0, h, 0.0),
        }
    }

    /// Applies the full transform (rotation and translation) to a point.
    pub fn transform(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: self.a * p.x + self.b * p.y + self.tx,
            y: self.c * p.x + self.d * p.y + self.ty,
        }
    }

    /// Applies only the linear part, for deltas that must not be translated.
    pub fn transform_without_translation(&self, v: Vec2) -> Vec2 {
        Vec2 {
            x: self.a * v.x + self.b * v.y,
            y: self.c * v.x + self.d * v.y,
        }
    }

    /// Returns the inverse transform, or `None` if this transform is degenerate.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Transform {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + b * self.ty),
            ty: -(c * self.tx + d * self.ty),
        })
    }
}
