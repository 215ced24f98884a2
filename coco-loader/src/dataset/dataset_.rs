use super::{AnnotationIndex, AnnotationRecord, CategoryId, CocoIndex, ImageId, Sample};
use crate::{
    common::*,
    transform::{Identity, Transform},
};

/// The dataset that can be random accessed.
pub trait RandomAccessDataset {
    type Item;

    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Get the nth record in the dataset.
    fn nth(&self, index: usize) -> Result<Self::Item>;
}

/// The COCO detection dataset backed by an image directory.
///
/// Images are ordered by ascending image id. Every access re-reads the image
/// file and queries the annotation index again. Nothing is cached.
#[derive(Debug, Clone)]
pub struct CocoDataset<T = Identity, X = CocoIndex> {
    root: PathBuf,
    index: X,
    transform: T,
    ids: Vec<ImageId>,
}

impl CocoDataset {
    /// Load the dataset without a transform. Samples carry the decoded RGB image.
    pub fn open(root: impl AsRef<Path>, annotation_file: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_transform(root, annotation_file, Identity)
    }
}

impl<T> CocoDataset<T, CocoIndex> {
    /// Load the dataset with a transform applied to each decoded image.
    pub fn open_with_transform(
        root: impl AsRef<Path>,
        annotation_file: impl AsRef<Path>,
        transform: T,
    ) -> Result<Self> {
        let index = CocoIndex::open(annotation_file)?;
        Ok(Self::from_index(root, index, transform))
    }

    /// Look up the category name of an annotation label.
    pub fn category_name(&self, label: CategoryId) -> Option<&str> {
        self.index.category(label).map(|cat| cat.name.as_str())
    }
}

impl<T, X> CocoDataset<T, X>
where
    X: AnnotationIndex,
{
    pub fn from_index(root: impl AsRef<Path>, index: X, transform: T) -> Self {
        let mut ids = index.image_ids();
        ids.sort_unstable();
        ids.dedup();

        Self {
            root: root.as_ref().to_owned(),
            index,
            transform,
            ids,
        }
    }

    /// Load the sample at `index`.
    pub fn get(&self, index: usize) -> Result<Sample<T::Output>>
    where
        T: Transform<RgbImage>,
        for<'a> AnnotationRecord: From<&'a X::Annotation>,
    {
        let image_id = self.image_id(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        let ann_ids = self.index.annotation_ids(image_id);
        let anns = self.index.load_annotations(&ann_ids)?;
        let path = self.root.join(self.index.image_file_name(image_id)?);

        trace!(
            "load image {} with {} annotations from '{}'",
            image_id,
            anns.len(),
            path.display()
        );

        let image = load_rgb_image(&path)?;
        let image = self.transform.apply(image);
        let annotations = anns.into_iter().map(AnnotationRecord::from).collect();

        Ok(Sample { image, annotations })
    }

    /// Get the image file path of the sample at `index`.
    pub fn image_path(&self, index: usize) -> Result<PathBuf> {
        let image_id = self.image_id(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        Ok(self.root.join(self.index.image_file_name(image_id)?))
    }
}

impl<T, X> CocoDataset<T, X> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Image ids in ascending order. The position of an id is its sample index.
    pub fn ids(&self) -> &[ImageId] {
        &self.ids
    }

    pub fn image_id(&self, index: usize) -> Option<ImageId> {
        self.ids.get(index).copied()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &X {
        &self.index
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Replace the transform, keeping the index and the image order.
    pub fn with_transform<U>(self, transform: U) -> CocoDataset<U, X> {
        let Self {
            root, index, ids, ..
        } = self;

        CocoDataset {
            root,
            index,
            transform,
            ids,
        }
    }
}

impl<T, X> RandomAccessDataset for CocoDataset<T, X>
where
    X: AnnotationIndex,
    T: Transform<RgbImage>,
    for<'a> AnnotationRecord: From<&'a X::Annotation>,
{
    type Item = Sample<T::Output>;

    fn num_records(&self) -> usize {
        self.len()
    }

    fn nth(&self, index: usize) -> Result<Self::Item> {
        self.get(index)
    }
}

/// Decode an image file into 8-bit RGB.
///
/// Grayscale, palette and alpha images are converted and alpha is dropped.
/// The file is closed before returning.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage> {
    let reader = image::io::Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
    let image = reader.decode().map_err(|source| Error::Decode {
        path: path.to_owned(),
        source,
    })?;
    Ok(image.into_rgb8())
}
