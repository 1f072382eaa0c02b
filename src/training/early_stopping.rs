use ndarray::ArrayView1;

/// Tracks the best metric of every parallel run and how long each one went without improving.
///
/// A run improves when its metric is strictly lower than its best so far. A run that went
/// `patience` epochs without improving is stalled until it improves again.
#[derive(Debug, Clone)]
pub(super) struct EarlyStopping {
    patience: usize,
    best: Vec<f64>,
    counter: Vec<usize>,
    stalled_at: Vec<Option<usize>>,
}

impl EarlyStopping {
    pub(super) fn new(patience: usize, parallel_runs: usize) -> Self {
        Self {
            patience,
            best: vec![f64::INFINITY; parallel_runs],
            counter: vec![0; parallel_runs],
            stalled_at: vec![None; parallel_runs],
        }
    }

    pub(super) fn patience(&self) -> usize {
        self.patience
    }

    /// Records the metric of every run at `epoch`.
    ///
    /// # Returns
    /// Whether every run is stalled.
    pub(super) fn check(&mut self, epoch: usize, errors: ArrayView1<f64>) -> bool {
        for (run, &error) in errors.iter().enumerate() {
            if error < self.best[run] {
                self.best[run] = error;
                self.counter[run] = 0;
                self.stalled_at[run] = None;
                continue;
            }

            self.counter[run] += 1;
            if self.counter[run] == self.patience {
                self.stalled_at[run] = Some(epoch);
            }
        }

        self.stalled_at.iter().all(Option::is_some)
    }

    pub(super) fn into_stalled_at(self) -> Vec<Option<usize>> {
        self.stalled_at
    }
}
