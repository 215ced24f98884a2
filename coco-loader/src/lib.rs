//! Loading COCO detection datasets into training batches.
//!
//! [CocoDataset](dataset::CocoDataset) gives random access to
//! `(image, annotations)` samples and [collate](collate::collate) stacks a
//! list of samples into a [Batch](collate::Batch) while keeping the
//! per-image annotation lists untouched.

mod common;
pub mod collate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod transform;

pub use collate::{collate, Batch};
pub use dataset::{AnnotationRecord, CocoDataset, CocoIndex, Sample};
pub use error::{Error, Result};
pub use loader::DataLoader;
