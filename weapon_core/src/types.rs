//! Small geometric types shared by the engine and its hosts

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A position, offset or velocity in block units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Length in the XZ plane
    pub fn horizontal_length(self) -> f64 {
        self.x.hypot(self.z)
    }

    /// Copy of this vector with the Y component zeroed
    pub fn flattened(self) -> Vec3 {
        Vec3 { y: 0.0, ..self }
    }

    /// Angle to another vector in degrees (NaN when either is zero-length)
    pub fn angle_to(self, other: Vec3) -> f64 {
        (self.dot(other) / (self.length() * other.length()))
            .acos()
            .to_degrees()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        (self - other).length()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
