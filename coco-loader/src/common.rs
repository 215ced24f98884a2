//! Common imports from external crates.

pub use crate::error::{Error, Result};
pub use image::{imageops::FilterType, RgbImage};
pub use indexmap::IndexMap;
pub use itertools::izip;
pub use log::{debug, info, trace, warn};
pub use ndarray::{Array, Array3, ArrayView, Axis, Dimension, RemoveAxis};
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Deserializer, Serialize};
pub use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
