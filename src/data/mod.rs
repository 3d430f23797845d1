//! Image classification datasets
//!
//! Loads the MNIST IDX files, scales pixels to `[0, 1]` and carves a
//! validation split off the end of the training set.

pub mod idx;

pub use idx::{read_idx_images, read_idx_labels};

use ndarray::{s, Array1, Array3};
use std::path::Path;

use crate::error::{Error, Result};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Images scaled to `[0, 1]` with one label each.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDataset {
    pub images: Array3<f32>,
    pub labels: Array1<u8>,
}

impl ImageDataset {
    pub fn new(images: Array3<f32>, labels: Array1<u8>) -> Result<Self> {
        if images.dim().0 != labels.len() {
            return Err(Error::Dataset(format!(
                "{} images but {} labels",
                images.dim().0,
                labels.len()
            )));
        }
        Ok(Self { images, labels })
    }

    /// Scale raw pixels by 1/255.
    pub fn from_raw(images: &Array3<u8>, labels: Array1<u8>) -> Result<Self> {
        Self::new(images.mapv(|p| f32::from(p) / 255.0), labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(rows, cols)` of each image.
    pub fn image_shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.images.dim();
        (rows, cols)
    }

    /// Move the last `n` samples into a new dataset.
    pub fn split_off_validation(&mut self, n: usize) -> Result<ImageDataset> {
        let len = self.len();
        if n > len {
            return Err(Error::Dataset(format!(
                "validation size {n} exceeds {len} samples"
            )));
        }
        let cut = len - n;
        let validation = ImageDataset {
            images: self.images.slice(s![cut.., .., ..]).to_owned(),
            labels: self.labels.slice(s![cut..]).to_owned(),
        };
        self.images = self.images.slice(s![..cut, .., ..]).to_owned();
        self.labels = self.labels.slice(s![..cut]).to_owned();
        Ok(validation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplits {
    pub train: ImageDataset,
    pub validation: ImageDataset,
    pub test: ImageDataset,
}

/// Load the four standard MNIST files from `dir`, holding out the last
/// `validation_size` training samples for validation.
pub fn load_mnist<P: AsRef<Path>>(dir: P, validation_size: usize) -> Result<DatasetSplits> {
    let dir = dir.as_ref();
    let load = |images: &str, labels: &str| -> Result<ImageDataset> {
        let raw = read_idx_images(dir.join(images))?;
        ImageDataset::from_raw(&raw, read_idx_labels(dir.join(labels))?)
    };

    let mut train = load(TRAIN_IMAGES, TRAIN_LABELS)?;
    let test = load(TEST_IMAGES, TEST_LABELS)?;
    let validation = train.split_off_validation(validation_size)?;
    tracing::info!(
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        "loaded MNIST"
    );
    Ok(DatasetSplits { train, validation, test })
}
