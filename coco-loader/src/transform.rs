//! Image transforms applied by the dataset after decoding.

use crate::common::*;

/// A transformation from one image representation to another.
///
/// Transforms used before [collate](crate::collate::collate) must produce
/// the same shape on every call for a fixed configuration.
pub trait Transform<I> {
    type Output;

    fn apply(&self, input: I) -> Self::Output;
}

impl<I, O, F> Transform<I> for F
where
    F: Fn(I) -> O,
{
    type Output = O;

    fn apply(&self, input: I) -> Self::Output {
        self(input)
    }
}

/// Extension methods for [Transform] implementors.
pub trait TransformExt {
    /// Apply `self` then `next`.
    fn then<B>(self, next: B) -> Compose<Self, B>
    where
        Self: Sized,
    {
        Compose(self, next)
    }
}

impl<T> TransformExt for T {}

/// The transform that returns the input as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<I> Transform<I> for Identity {
    type Output = I;

    fn apply(&self, input: I) -> Self::Output {
        input
    }
}

/// Two transforms applied in sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compose<A, B>(pub A, pub B);

impl<I, A, B> Transform<I> for Compose<A, B>
where
    A: Transform<I>,
    B: Transform<A::Output>,
{
    type Output = B::Output;

    fn apply(&self, input: I) -> Self::Output {
        self.1.apply(self.0.apply(input))
    }
}

/// Resize to an exact size regardless of the aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Resize {
    pub height: u32,
    pub width: u32,
    pub filter: FilterType,
}

impl Resize {
    pub fn new(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            filter: FilterType::Triangle,
        }
    }
}

impl Transform<RgbImage> for Resize {
    type Output = RgbImage;

    fn apply(&self, input: RgbImage) -> Self::Output {
        let Self {
            height,
            width,
            filter,
        } = *self;

        if input.dimensions() == (width, height) {
            return input;
        }
        image::imageops::resize(&input, width, height, filter)
    }
}

/// Convert an RGB image to a `[channel, height, width]` tensor in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToTensor;

impl Transform<RgbImage> for ToTensor {
    type Output = Array3<f32>;

    fn apply(&self, input: RgbImage) -> Self::Output {
        let (width, height) = input.dimensions();
        let shape = (height as usize, width as usize, 3);
        let hwc = Array3::from_shape_vec(shape, input.into_raw())
            .unwrap_or_else(|_| unreachable!("RGB buffer length matches its dimensions"));
        hwc.permuted_axes([2, 0, 1])
            .as_standard_layout()
            .mapv(|value| value as f32 / 255.0)
    }
}

/// Per-channel normalization `(value - mean) / std` on CHW tensors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalize {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalize {
    /// The statistics of the ImageNet training set.
    pub fn imagenet() -> Self {
        Self {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

impl Transform<Array3<f32>> for Normalize {
    type Output = Array3<f32>;

    fn apply(&self, mut input: Array3<f32>) -> Self::Output {
        izip!(input.axis_iter_mut(Axis(0)), self.mean, self.std).for_each(
            |(mut channel, mean, std)| {
                channel.mapv_inplace(|value| (value - mean) / std);
            },
        );
        input
    }
}

/// The preprocessing pipeline `[Resize] -> ToTensor -> [Normalize]`.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    pub resize: Option<Resize>,
    pub normalize: Option<Normalize>,
}

impl Transform<RgbImage> for Pipeline {
    type Output = Array3<f32>;

    fn apply(&self, input: RgbImage) -> Self::Output {
        let image = match &self.resize {
            Some(resize) => resize.apply(input),
            None => input,
        };
        let tensor = ToTensor.apply(image);
        match &self.normalize {
            Some(normalize) => normalize.apply(tensor),
            None => tensor,
        }
    }
}
