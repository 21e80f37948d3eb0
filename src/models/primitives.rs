use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

pub type FloatType = f64;
pub type IntType = i32;

/// Axial hex coordinate, either absolute or relative to an observer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct HexOffset {
    pub x: IntType,
    pub y: IntType,
}

impl HexOffset {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: IntType, y: IntType) -> Self {
        Self { x, y }
    }

    /// Squared hex distance from the origin, exact in integers
    pub fn dist2(&self) -> IntType {
        self.x * self.x + self.y * self.y - self.x * self.y
    }

    pub fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Add for HexOffset {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for HexOffset {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(IntType, IntType)> for HexOffset {
    fn from((x, y): (IntType, IntType)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for HexOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cartesian point or vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: FloatType,
    pub y: FloatType,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: FloatType, y: FloatType) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: Self) -> FloatType {
        self.x * other.x + self.y * other.y
    }

    /// Positive if `other` is counter-clockwise of `self`, negative if clockwise
    pub fn cross(&self, other: Self) -> FloatType {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> FloatType {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Self {
        *self / self.length()
    }

    /// Rotate counter-clockwise by `theta` radians
    pub fn rotated(&self, theta: FloatType) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }
}

/// Positive, zero or negative if `p3` is left of, on, or right of the line from `p1` to `p2`
pub fn cross3(p1: Vector2, p2: Vector2, p3: Vector2) -> FloatType {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<FloatType> for Vector2 {
    type Output = Self;

    fn mul(self, factor: FloatType) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Div<FloatType> for Vector2 {
    type Output = Self;

    fn div(self, divisor: FloatType) -> Self {
        Self::new(self.x / divisor, self.y / divisor)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.x, self.y)
    }
}

/// One input cell of the world: absolute position and whether it blocks line of sight
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct TileSample {
    pub x: IntType,
    pub y: IntType,
    pub blocks_los: bool,
}

impl TileSample {
    pub fn new(x: IntType, y: IntType, blocks_los: bool) -> Self {
        Self { x, y, blocks_los }
    }

    pub fn offset(&self) -> HexOffset {
        HexOffset::new(self.x, self.y)
    }
}

/// One output cell: absolute position, cover in [0, 1] and squared distance to the observer
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TileCover {
    pub offset: HexOffset,
    pub cover: FloatType,
    pub dist2: IntType,
}

impl TileCover {
    pub fn is_visible(&self) -> bool {
        self.cover < 1.0
    }
}
