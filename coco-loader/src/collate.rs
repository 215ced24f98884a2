//! Batch assembly with uniform images and variable-length annotations.

use crate::{common::*, dataset::AnnotationRecord, dataset::Sample};

/// A batch of samples.
///
/// `targets[i]` holds the annotations of `images[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<A, D>
where
    D: Dimension,
{
    /// Images stacked along a new leading batch axis.
    pub images: Array<A, D>,
    pub targets: Vec<Vec<AnnotationRecord>>,
}

impl<A, D> Batch<A, D>
where
    D: Dimension,
{
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Stack the images of samples and keep their annotation lists as they are.
///
/// All images must have identical shapes. Annotation lists are neither
/// padded nor truncated.
pub fn collate<A, D>(samples: Vec<Sample<Array<A, D>>>) -> Result<Batch<A, D::Larger>>
where
    A: Clone,
    D: Dimension,
    D::Larger: RemoveAxis,
{
    let (images, targets): (Vec<_>, Vec<_>) = samples
        .into_iter()
        .map(|Sample { image, annotations }| (image, annotations))
        .unzip();

    let expected = images.first().ok_or(Error::EmptyBatch)?.shape().to_vec();
    let views: Vec<ArrayView<A, D>> = images.iter().map(|image| image.view()).collect();
    let stacked = ndarray::stack(Axis(0), &views).map_err(|_| {
        let (index, found) = images
            .iter()
            .map(|image| image.shape().to_vec())
            .enumerate()
            .find(|(_, shape)| *shape != expected)
            .unwrap_or_else(|| (0, expected.clone()));

        Error::ShapeMismatch {
            index,
            expected: expected.clone(),
            found,
        }
    })?;

    debug_assert_eq!(stacked.shape()[0], targets.len());
    Ok(Batch {
        images: stacked,
        targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::XYWH;
    use ndarray::{Array3, Array4};

    fn record(label: u64) -> AnnotationRecord {
        AnnotationRecord {
            bbox: XYWH::from_xywh([label as f64, 0.0, 1.0, 1.0]),
            label,
        }
    }

    fn sample(fill: f32, shape: (usize, usize, usize), num_anns: u64) -> Sample<Array3<f32>> {
        Sample {
            image: Array3::from_elem(shape, fill),
            annotations: (0..num_anns).map(record).collect(),
        }
    }

    #[test]
    fn collate_keeps_heterogeneous_targets() {
        let samples = vec![
            sample(0.0, (3, 4, 5), 2),
            sample(1.0, (3, 4, 5), 0),
            sample(2.0, (3, 4, 5), 5),
        ];
        let expected_targets: Vec<_> = samples.iter().map(|s| s.annotations.clone()).collect();

        let batch = collate(samples).unwrap();
        let images: &Array4<f32> = &batch.images;
        assert_eq!(images.shape(), &[3, 3, 4, 5]);
        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.targets.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![2, 0, 5]
        );
        assert_eq!(batch.targets, expected_targets);

        // image order is preserved
        for (index, image) in images.outer_iter().enumerate() {
            assert!(image.iter().all(|&value| value == index as f32));
        }
    }

    #[test]
    fn collate_shape_mismatch() {
        let samples = vec![
            sample(0.0, (3, 224, 224), 1),
            sample(0.0, (3, 224, 224), 1),
            sample(0.0, (3, 128, 128), 1),
        ];
        match collate(samples) {
            Err(Error::ShapeMismatch {
                index,
                expected,
                found,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(expected, vec![3, 224, 224]);
                assert_eq!(found, vec![3, 128, 128]);
            }
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn collate_empty_batch() {
        let samples: Vec<Sample<Array3<f32>>> = vec![];
        assert!(matches!(collate(samples), Err(Error::EmptyBatch)));
    }
}
