//! The COCO annotation file format, object detection variant.

use super::{AnnotationId, CategoryId, ImageId};
use crate::common::*;
use serde::de::IgnoredAny;

/// The top-level content of an annotation file.
///
/// Only the fields read by the loader are typed. Other content such as
/// `info`, `licenses` or image capture dates is skipped, so tools writing
/// off-type metadata do not break loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CocoFile {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// The image metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    /// The file path relative to the image root directory.
    pub file_name: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// An object instance annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,
    /// The box in `[x, y, width, height]` pixel units.
    pub bbox: [f64; 4],
    #[serde(default, deserialize_with = "deserialize_iscrowd")]
    pub iscrowd: bool,
    #[serde(default)]
    pub segmentation: Option<Segmentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segmentation {
    Polygon(Vec<Vec<f64>>),
    CompressedRle { size: [u32; 2], counts: String },
    UncompressedRle { size: [u32; 2], counts: Vec<u32> },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub supercategory: Option<String>,
}

fn deserialize_iscrowd<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IsCrowd {
        Bool(bool),
        Int(i64),
        Other(IgnoredAny),
    }

    Ok(match IsCrowd::deserialize(deserializer)? {
        IsCrowd::Bool(value) => value,
        IsCrowd::Int(value) => value != 0,
        IsCrowd::Other(_) => false,
    })
}
