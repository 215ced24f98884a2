//! Bounding box types in the COCO `[x, y, w, h]` convention.

mod common;

pub use rect::*;
pub mod rect;

pub use xywh::*;
pub mod xywh;

pub mod prelude {
    pub use crate::rect::Rect;
}
