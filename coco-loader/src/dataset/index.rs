use super::{
    coco_::{Annotation, Category, CocoFile, Image},
    AnnotationId, CategoryId, ImageId,
};
use crate::{common::*, error::LoadError};
use bbox::{prelude::*, XYWH};
use std::str::FromStr;

/// The queries a dataset needs from an annotation index.
pub trait AnnotationIndex {
    /// The annotation type stored in the index.
    type Annotation;

    /// Get all image ids in the index, in no particular order.
    fn image_ids(&self) -> Vec<ImageId>;

    /// Get ids of annotations that belong to the image.
    ///
    /// Images without annotations and unknown images yield an empty list.
    fn annotation_ids(&self, image_id: ImageId) -> Vec<AnnotationId>;

    /// Look up annotations by ids, keeping the order of `ids`.
    fn load_annotations(&self, ids: &[AnnotationId]) -> Result<Vec<&Self::Annotation>>;

    /// Get the image file path relative to the image root directory.
    fn image_file_name(&self, image_id: ImageId) -> Result<&str>;
}

/// The in-memory index of a COCO annotation file.
#[derive(Debug, Clone)]
pub struct CocoIndex {
    images: IndexMap<ImageId, Image>,
    annotations: IndexMap<AnnotationId, Annotation>,
    categories: IndexMap<CategoryId, Category>,
    image_to_annotations: HashMap<ImageId, Vec<AnnotationId>>,
}

impl CocoIndex {
    /// Load and index an annotation file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading annotation file '{}'", path.display());

        let file = File::open(path).map_err(|err| Error::load(path, err))?;
        let index = Self::from_reader(BufReader::new(file)).map_err(|err| Error::load(path, err))?;

        info!(
            "indexed {} images, {} annotations and {} categories from '{}'",
            index.images.len(),
            index.annotations.len(),
            index.categories.len(),
            path.display()
        );

        Ok(index)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let file: CocoFile = serde_json::from_reader(reader)?;
        Ok(Self::new(file))
    }

    /// Build the index from parsed file content.
    pub fn new(file: CocoFile) -> Self {
        let CocoFile {
            images: image_list,
            annotations: annotation_list,
            categories: category_list,
            ..
        } = file;

        let mut images = IndexMap::with_capacity(image_list.len());
        for image in image_list {
            if let Some(prev) = images.insert(image.id, image) {
                warn!(
                    "duplicated image id {}, the entry for '{}' is replaced",
                    prev.id, prev.file_name
                );
            }
        }

        let mut annotations = IndexMap::with_capacity(annotation_list.len());
        let mut image_to_annotations: HashMap<_, Vec<_>> = HashMap::new();
        let mut num_empty_boxes = 0;
        for ann in annotation_list {
            let Annotation { id: ann_id, image_id, bbox, .. } = ann;
            let rect = XYWH::from_xywh(bbox);
            if rect.h() <= 0.0 || rect.w() <= 0.0 {
                num_empty_boxes += 1;
            }

            if let Some(prev) = annotations.insert(ann_id, ann) {
                warn!(
                    "duplicated annotation id {}, the former entry is replaced",
                    ann_id
                );
                if let Some(ann_ids) = image_to_annotations.get_mut(&prev.image_id) {
                    ann_ids.retain(|&id| id != ann_id);
                }
            }
            image_to_annotations
                .entry(image_id)
                .or_default()
                .push(ann_id);
        }
        if num_empty_boxes > 0 {
            warn!("{} annotations have boxes with empty area", num_empty_boxes);
        }

        let dangling = image_to_annotations
            .iter()
            .filter(|(image_id, _)| !images.contains_key(*image_id))
            .map(|(_, ann_ids)| ann_ids.len())
            .sum::<usize>();
        if dangling > 0 {
            warn!(
                "{} annotations refer to images not defined in the annotation file",
                dangling
            );
        }

        let categories = category_list
            .into_iter()
            .map(|cat| (cat.id, cat))
            .collect();

        Self {
            images,
            annotations,
            categories,
            image_to_annotations,
        }
    }

    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.get(&id)
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Categories in the order of the annotation file.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn num_images(&self) -> usize {
        self.images.len()
    }

    pub fn num_annotations(&self) -> usize {
        self.annotations.len()
    }
}

impl FromStr for CocoIndex {
    type Err = LoadError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let file: CocoFile = serde_json::from_str(text)?;
        Ok(Self::new(file))
    }
}

impl AnnotationIndex for CocoIndex {
    type Annotation = Annotation;

    fn image_ids(&self) -> Vec<ImageId> {
        self.images.keys().copied().collect()
    }

    fn annotation_ids(&self, image_id: ImageId) -> Vec<AnnotationId> {
        self.image_to_annotations
            .get(&image_id)
            .cloned()
            .unwrap_or_default()
    }

    fn load_annotations(&self, ids: &[AnnotationId]) -> Result<Vec<&Annotation>> {
        ids.iter()
            .map(|&id| {
                self.annotations
                    .get(&id)
                    .ok_or(Error::UnknownAnnotation(id))
            })
            .collect()
    }

    fn image_file_name(&self, image_id: ImageId) -> Result<&str> {
        self.images
            .get(&image_id)
            .map(|image| image.file_name.as_str())
            .ok_or(Error::UnknownImage(image_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNOTATIONS: &str = r#"{
        "images": [
            {"id": 42, "file_name": "b.png", "height": 4, "width": 6},
            {"id": 7, "file_name": "a.png", "height": 4, "width": 6},
            {"id": 13, "file_name": "c.png", "height": 4, "width": 6}
        ],
        "annotations": [
            {"id": 3, "image_id": 42, "category_id": 2, "bbox": [0, 0, 2, 2]},
            {"id": 1, "image_id": 7, "category_id": 1, "bbox": [1, 1, 2, 2]},
            {"id": 2, "image_id": 42, "category_id": 5, "bbox": [2, 1, 3, 2]},
            {"id": 9, "image_id": 99, "category_id": 5, "bbox": [2, 1, 3, 2]}
        ],
        "categories": [
            {"id": 1, "name": "person"},
            {"id": 2, "name": "bicycle"},
            {"id": 5, "name": "airplane", "supercategory": "vehicle"}
        ]
    }"#;

    #[test]
    fn index_queries() {
        let index = ANNOTATIONS.parse::<CocoIndex>().unwrap();

        let mut ids = index.image_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![7, 13, 42]);

        assert_eq!(index.annotation_ids(42), vec![3, 2]);
        assert_eq!(index.annotation_ids(7), vec![1]);
        assert!(index.annotation_ids(13).is_empty());
        assert!(index.annotation_ids(1000).is_empty());

        // dangling annotations stay reachable by image id
        assert_eq!(index.annotation_ids(99), vec![9]);

        let anns = index.load_annotations(&[2, 3]).unwrap();
        assert_eq!(
            anns.iter().map(|ann| ann.category_id).collect::<Vec<_>>(),
            vec![5, 2]
        );

        assert_eq!(index.image_file_name(7).unwrap(), "a.png");
        assert_eq!(index.num_images(), 3);
        assert_eq!(index.num_annotations(), 4);
        assert_eq!(index.category(5).unwrap().name, "airplane");
        assert_eq!(
            index.categories().map(|cat| cat.id).collect::<Vec<_>>(),
            vec![1, 2, 5]
        );
    }

    #[test]
    fn index_unknown_ids() {
        let index = ANNOTATIONS.parse::<CocoIndex>().unwrap();
        assert!(matches!(
            index.load_annotations(&[1, 404]),
            Err(Error::UnknownAnnotation(404))
        ));
        assert!(matches!(
            index.image_file_name(404),
            Err(Error::UnknownImage(404))
        ));
    }

    #[test]
    fn index_duplicated_image_id() {
        let index: CocoIndex = r#"{"images": [
            {"id": 1, "file_name": "old.png"},
            {"id": 1, "file_name": "new.png"}
        ]}"#
        .parse()
        .unwrap();
        assert_eq!(index.image_ids(), vec![1]);
        assert_eq!(index.image_file_name(1).unwrap(), "new.png");
    }

    #[test]
    fn index_duplicated_annotation_id() {
        let index: CocoIndex = r#"{
            "images": [{"id": 1, "file_name": "a.png"}],
            "annotations": [
                {"id": 5, "image_id": 1, "category_id": 1, "bbox": [0, 0, 1, 1]},
                {"id": 7, "image_id": 1, "category_id": 3, "bbox": [0, 0, 0, 1]},
                {"id": 5, "image_id": 1, "category_id": 2, "bbox": [0, 0, 1, 1]}
            ]
        }"#
        .parse()
        .unwrap();
        assert_eq!(index.num_annotations(), 2);
        assert_eq!(index.annotation(5).unwrap().category_id, 2);
        assert_eq!(index.annotation_ids(1), vec![7, 5]);
        // boxes with empty area are kept
        assert_eq!(index.annotation(7).unwrap().bbox, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn index_load_errors() {
        assert!(matches!(
            r#"{"images": 3}"#.parse::<CocoIndex>(),
            Err(LoadError::Parse(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        match CocoIndex::open(&path) {
            Err(Error::Load {
                path: err_path,
                source: LoadError::Io(_),
            }) => assert_eq!(err_path, path),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
