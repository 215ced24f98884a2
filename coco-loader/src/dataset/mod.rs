//! Dataset loading toolkit.

pub mod coco_;
mod dataset_;
mod index;
mod record;

pub use coco_::{Annotation, Category, CocoFile, Image};
pub use dataset_::*;
pub use index::*;
pub use record::*;

pub type ImageId = u64;
pub type AnnotationId = u64;
pub type CategoryId = u64;
