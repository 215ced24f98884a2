use super::Rect;
use crate::common::*;

/// Bounding box in XYWH format, where `(x, y)` is the top-left corner.
///
/// The values are stored as given. No sign or range check is applied since
/// annotation files are known to carry degenerate boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XYWH<T> {
    pub(crate) x: T,
    pub(crate) y: T,
    pub(crate) w: T,
    pub(crate) h: T,
}

impl<T> XYWH<T> {
    pub fn from_xywh(xywh: [T; 4]) -> Self {
        let [x, y, w, h] = xywh;
        Self { x, y, w, h }
    }
}

impl<T> XYWH<T>
where
    T: Copy,
{
    pub fn x(&self) -> T {
        self.x
    }

    pub fn y(&self) -> T {
        self.y
    }

    /// The four values in `[x, y, w, h]` order.
    pub fn xywh(&self) -> [T; 4] {
        [self.x, self.y, self.w, self.h]
    }
}

impl<T> From<[T; 4]> for XYWH<T> {
    fn from(xywh: [T; 4]) -> Self {
        Self::from_xywh(xywh)
    }
}

impl<T> From<XYWH<T>> for [T; 4]
where
    T: Copy,
{
    fn from(rect: XYWH<T>) -> Self {
        rect.xywh()
    }
}

impl<T> Rect for XYWH<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.y
    }

    fn l(&self) -> Self::Type {
        self.x
    }

    fn b(&self) -> Self::Type {
        self.y + self.h
    }

    fn r(&self) -> Self::Type {
        self.x + self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn w(&self) -> Self::Type {
        self.w
    }
}
