//! Data loading configuration format.

use crate::{
    common::*,
    dataset::CocoDataset,
    transform::{Normalize, Pipeline, Resize},
};
use anyhow::{ensure, Context as _};

/// The data loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub preprocessor: PreprocessorConfig,
    pub loader: LoaderConfig,
}

impl Config {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Self = json5::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        config.preprocessor.validate()?;
        Ok(config)
    }

    /// Load the dataset with the configured preprocessing pipeline.
    pub fn load_dataset(&self) -> Result<CocoDataset<Pipeline>> {
        self.dataset.load(self.preprocessor.pipeline())
    }
}

/// Dataset location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory that image file names are relative to.
    pub root: PathBuf,
    /// The COCO annotation JSON file.
    pub annotation_file: PathBuf,
}

impl DatasetConfig {
    pub fn load<T>(&self, transform: T) -> Result<CocoDataset<T>> {
        CocoDataset::open_with_transform(&self.root, &self.annotation_file, transform)
    }
}

/// Image preprocessing options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    /// If set, images are resized to `[height, width]`.
    pub image_size: Option<[u32; 2]>,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
    /// Per-channel mean and standard deviation applied after scaling to `[0, 1]`.
    pub normalize: Option<Normalize>,
}

impl PreprocessorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some([height, width]) = self.image_size {
            ensure!(height > 0 && width > 0, "image_size must be positive");
        }
        if let Some(Normalize { std, .. }) = &self.normalize {
            ensure!(
                std.iter().all(|&value| value > 0.0),
                "normalize.std must be positive"
            );
        }
        Ok(())
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline {
            resize: self.image_size.map(|[height, width]| Resize {
                height,
                width,
                filter: self.resize_filter.into(),
            }),
            normalize: self.normalize,
        }
    }
}

/// The interpolation used by resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Batch iteration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub batch_size: NonZeroUsize,
    /// If set, visit samples in a random order.
    #[serde(default)]
    pub shuffle: bool,
    /// The random seed for shuffling. A random seed is drawn if not set.
    #[serde(default)]
    pub seed: Option<u64>,
    /// If set, the last incomplete batch is dropped.
    #[serde(default)]
    pub drop_last: bool,
}
