use ndarray::ArrayView2;

/// A metric comparing a prediction against its target, reduced to a single scalar.
///
/// Both arrays are shaped `(samples, outputs)`.
pub trait LossFn {
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64;
}

impl<F> LossFn for F
where
    F: Fn(ArrayView2<f64>, ArrayView2<f64>) -> f64,
{
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64 {
        self(y_pred, y)
    }
}
