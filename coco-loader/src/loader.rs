//! Sequential batch iteration over a random access dataset.

use crate::{
    collate::{collate, Batch},
    common::*,
    config::LoaderConfig,
    dataset::{RandomAccessDataset, Sample},
};

/// Iterates over batches by loading samples one at a time and collating them.
///
/// Errors are yielded as they happen. A failed batch consumes its indices, so
/// the iteration can continue with the next batch if the caller wishes.
#[derive(Debug)]
pub struct DataLoader<'a, D> {
    dataset: &'a D,
    batch_size: usize,
    drop_last: bool,
    order: Vec<usize>,
    cursor: usize,
}

impl<'a, D> DataLoader<'a, D>
where
    D: RandomAccessDataset,
{
    pub fn new(dataset: &'a D, config: &LoaderConfig) -> Self {
        let LoaderConfig {
            batch_size,
            shuffle,
            seed,
            drop_last,
        } = *config;

        let mut order: Vec<_> = (0..dataset.num_records()).collect();
        if shuffle {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            order.shuffle(&mut rng);
        }

        Self {
            dataset,
            batch_size: batch_size.get(),
            drop_last,
            order,
            cursor: 0,
        }
    }

    /// The number of batches in one pass over the dataset.
    pub fn num_batches(&self) -> usize {
        let num_records = self.order.len();
        if self.drop_last {
            num_records / self.batch_size
        } else {
            (num_records + self.batch_size - 1) / self.batch_size
        }
    }

    /// Dataset indices in the order they are visited.
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

impl<'a, D, A, Dim> Iterator for DataLoader<'a, D>
where
    D: RandomAccessDataset<Item = Sample<Array<A, Dim>>>,
    A: Clone,
    Dim: Dimension,
    Dim::Larger: RemoveAxis,
{
    type Item = Result<Batch<A, Dim::Larger>>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.order.len() - self.cursor;
        if remaining == 0 || (self.drop_last && remaining < self.batch_size) {
            return None;
        }

        let end = self.cursor + remaining.min(self.batch_size);
        let indices = &self.order[self.cursor..end];
        self.cursor = end;
        debug!("load batch with indices {:?}", indices);

        let result = indices
            .iter()
            .map(|&index| self.dataset.nth(index))
            .collect::<Result<Vec<_>>>()
            .and_then(collate);
        Some(result)
    }
}
