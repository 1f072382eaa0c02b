use ndarray::{Array, ArrayView, Axis, Dimension};

/// Softmax over the last axis of its input.
///
/// Every lane is shifted by its maximum before exponentiating.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Softmax;

impl Softmax {
    pub fn f<D: Dimension>(&self, z: ArrayView<f64, D>) -> Array<f64, D> {
        let mut a = z.to_owned();
        let Some(last) = a.ndim().checked_sub(1) else {
            return a.mapv_into(|_| 1.);
        };

        for mut lane in a.lanes_mut(Axis(last)) {
            let max = lane.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
            lane.mapv_inplace(|x| (x - max).exp());
            let sum = lane.sum();
            lane.mapv_inplace(|x| x / sum);
        }

        a
    }

    /// The diagonal of the softmax jacobian, `s * (1 - s)`.
    pub fn df<D: Dimension>(&self, z: ArrayView<f64, D>) -> Array<f64, D> {
        self.f(z).mapv_into(|s| s * (1. - s))
    }
}
