use super::{coco_::Annotation, CategoryId};
use bbox::XYWH;

/// The object annotation handed to the training pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationRecord {
    /// Bounding box in pixel units.
    pub bbox: XYWH<f64>,
    /// The category id as written in the annotation file.
    pub label: CategoryId,
}

impl From<&Annotation> for AnnotationRecord {
    fn from(ann: &Annotation) -> Self {
        // Only the box and category are kept.
        let Annotation {
            bbox,
            category_id,
            id: _,
            image_id: _,
            iscrowd: _,
            segmentation: _,
        } = *ann;

        Self {
            bbox: XYWH::from_xywh(bbox),
            label: category_id,
        }
    }
}

/// The loaded image along with its annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<I> {
    pub image: I,
    /// Annotations in the order of the annotation file.
    pub annotations: Vec<AnnotationRecord>,
}
