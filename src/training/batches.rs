use std::num::NonZeroUsize;

use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// A partition of the sample indices into equally sized mini-batches, reshuffled every epoch.
#[derive(Debug, Clone)]
pub struct MiniBatches {
    indices: Vec<usize>,
    size: usize,
}

impl MiniBatches {
    /// Creates a new `MiniBatches` over `0..data_size`.
    ///
    /// # Errors
    /// `MlErr::InvalidConfig` if there's no data or it can't be split evenly.
    pub fn new(data_size: usize, mini_batch_size: NonZeroUsize) -> Result<Self> {
        let size = mini_batch_size.get();

        if data_size == 0 {
            return Err(MlErr::config("can't train on an empty dataset"));
        }

        if data_size % size != 0 {
            return Err(MlErr::config(format!(
                "the mini-batch size ({size}) must divide the amount of samples ({data_size})"
            )));
        }

        Ok(Self {
            indices: (0..data_size).collect(),
            size,
        })
    }

    /// Draws a new permutation of the indices.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.indices.shuffle(rng);
    }

    /// Iterates over the mini-batches of the current permutation.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.indices.chunks_exact(self.size)
    }

    /// The amount of mini-batches per epoch.
    pub fn per_epoch(&self) -> usize {
        self.indices.len() / self.size
    }
}
