use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::Serialize;

/// The metric of every parallel run at the start of every epoch, shaped `(runs, epochs)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLog {
    errors: Array2<f64>,
    stalled_at: Vec<Option<usize>>,
}

impl ErrorLog {
    pub(crate) fn new(errors: Array2<f64>, stalled_at: Vec<Option<usize>>) -> Self {
        Self { errors, stalled_at }
    }

    pub fn errors(&self) -> ArrayView2<'_, f64> {
        self.errors.view()
    }

    /// The amount of epochs that were actually run.
    pub fn epochs(&self) -> usize {
        self.errors.ncols()
    }

    pub fn parallel_runs(&self) -> usize {
        self.errors.nrows()
    }

    /// The metric of a single run over the epochs.
    pub fn run(&self, run: usize) -> Option<ArrayView1<'_, f64>> {
        (run < self.parallel_runs()).then(|| self.errors.row(run))
    }

    /// The mean metric over the runs, per epoch.
    pub fn mean(&self) -> Array1<f64> {
        self.errors.sum_axis(Axis(0)) / self.parallel_runs() as f64
    }

    /// The lowest metric over the runs, per epoch.
    pub fn min(&self) -> Array1<f64> {
        self.errors
            .fold_axis(Axis(0), f64::INFINITY, |&acc, &e| acc.min(e))
    }

    /// The highest metric over the runs, per epoch.
    pub fn max(&self) -> Array1<f64> {
        self.errors
            .fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &e| acc.max(e))
    }

    /// The run with the lowest finite metric on the last epoch.
    pub fn best_run(&self) -> Option<usize> {
        let epochs = self.epochs();
        if epochs == 0 {
            return None;
        }

        self.errors
            .column(epochs - 1)
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_finite())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(run, _)| run)
    }

    /// The epoch at which `run` stopped improving, if early stopping was on and it did.
    pub fn stalled_at(&self, run: usize) -> Option<usize> {
        self.stalled_at.get(run).copied().flatten()
    }

    pub fn has_non_finite(&self) -> bool {
        self.errors.iter().any(|e| !e.is_finite())
    }

    /// Copies the log into one row per run.
    pub fn to_table(&self) -> Vec<Vec<f64>> {
        self.errors.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn log() -> ErrorLog {
        let errors = array![[4., 3., 2.], [6., 1., 5.], [2., 2., 1.5]];
        ErrorLog::new(errors, vec![None, Some(2), None])
    }

    #[test]
    fn statistics_are_taken_per_epoch() {
        let log = log();

        assert_eq!(log.epochs(), 3);
        assert_eq!(log.parallel_runs(), 3);
        assert_eq!(log.mean(), array![4., 2., 8.5 / 3.]);
        assert_eq!(log.min(), array![2., 1., 1.5]);
        assert_eq!(log.max(), array![6., 3., 5.]);
    }

    #[test]
    fn best_run_looks_at_the_last_epoch() {
        assert_eq!(log().best_run(), Some(2));

        let log = ErrorLog::new(array![[f64::NAN], [3.]], vec![None, None]);
        assert_eq!(log.best_run(), Some(1));
        assert!(log.has_non_finite());
    }

    #[test]
    fn table_rows_are_runs() {
        let log = log();

        assert_eq!(log.to_table()[1], vec![6., 1., 5.]);
        assert_eq!(log.run(0).unwrap().to_vec(), vec![4., 3., 2.]);
        assert!(log.run(3).is_none());
        assert_eq!(log.stalled_at(1), Some(2));
        assert_eq!(log.stalled_at(7), None);
    }

    #[test]
    fn serializes_as_a_table() {
        let json = serde_json::to_value(log()).unwrap();
        assert_eq!(json["stalled_at"], serde_json::json!([null, 2, null]));
    }
}
