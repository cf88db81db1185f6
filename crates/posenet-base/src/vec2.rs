use std::ops::{Add, Mul, Sub};

/// A point or vector in the image plane. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    fn zip(self, other: Self, f: impl Fn(T, T) -> T) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y))
    }
}

impl<T: Default> Vec2<T> {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, T::add)
    }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, T::sub)
    }
}

/// Per-axis scaling, e.g. by `(scale_x, scale_y)`.
impl<T: Mul<Output = T>> Mul for Vec2<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, T::mul)
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Vec2<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Vec2<f32> {
    /// Top-left corner of grid cell `(y, x)` on a grid with cells `stride` pixels wide.
    pub fn from_cell(y: usize, x: usize, stride: f32) -> Self {
        Self::new(x as f32 * stride, y as f32 * stride)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance_squared_to(self, other: Self) -> f32 {
        let d = other - self;
        d.dot(d)
    }

    pub fn distance_to(self, other: Self) -> f32 {
        self.distance_squared_to(other).sqrt()
    }
}
