use ndarray::{Array, ArrayView, Dimension, ShapeBuilder, Zip};

/// Gradient descent with momentum velocity for a single parameter tensor.
///
/// The velocity has the same shape as the parameters it updates, parallel run axis included.
#[derive(Debug, Clone)]
pub struct Velocity<D: Dimension> {
    momentum: f64,
    velocity: Array<f64, D>,
}

impl<D: Dimension> Velocity<D> {
    /// Creates a new zeroed `Velocity`.
    ///
    /// # Arguments
    /// * `momentum` - How much of the previous velocity to keep on each update.
    /// * `shape` - The shape of the parameters this velocity will update.
    pub fn zeros<Sh>(momentum: f64, shape: Sh) -> Self
    where
        Sh: ShapeBuilder<Dim = D>,
    {
        Self {
            momentum,
            velocity: Array::zeros(shape),
        }
    }

    /// Zeroes the velocity.
    pub fn reset(&mut self) {
        self.velocity.fill(0.);
    }

    /// Takes a step against `grad`:
    ///
    /// `v <- momentum * v + rate * grad; params <- params - v`
    pub fn descend(&mut self, params: &mut Array<f64, D>, grad: ArrayView<f64, D>, rate: f64) {
        let mu = self.momentum;

        Zip::from(params)
            .and(&mut self.velocity)
            .and(&grad)
            .for_each(|p, v, &g| {
                *v = mu * *v + rate * g;
                *p -= *v;
            });
    }

    /// Takes a step along `grad`, for gradients that already point downhill:
    ///
    /// `v <- momentum * v + rate * grad; params <- params + v`
    pub fn ascend(&mut self, params: &mut Array<f64, D>, grad: ArrayView<f64, D>, rate: f64) {
        let mu = self.momentum;

        Zip::from(params)
            .and(&mut self.velocity)
            .and(&grad)
            .for_each(|p, v, &g| {
                *v = mu * *v + rate * g;
                *p += *v;
            });
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, array};

    use super::*;

    #[test]
    fn zero_momentum_is_plain_gradient_descent() {
        let mut params = array![1.0, -2.0, 0.5];
        let grad = array![0.5, 1.0, -4.0];
        let mut velocity = Velocity::zeros(0., 3);

        velocity.descend(&mut params, grad.view(), 0.1);
        velocity.descend(&mut params, grad.view(), 0.1);

        let expected = array![1.0, -2.0, 0.5] - &grad * 0.2;
        assert!((&params - &expected).iter().all(|d| d.abs() < 1e-12));
    }

    #[test]
    fn momentum_accumulates_until_reset() {
        let mut params = Array1::zeros(1);
        let grad = array![1.0];
        let mut velocity = Velocity::zeros(0.5, 1);

        velocity.descend(&mut params, grad.view(), 1.);
        assert_eq!(params[0], -1.);

        velocity.descend(&mut params, grad.view(), 1.);
        assert_eq!(params[0], -2.5);

        velocity.reset();
        velocity.descend(&mut params, grad.view(), 1.);
        assert_eq!(params[0], -3.5);
    }

    #[test]
    fn ascend_mirrors_descend() {
        let mut up = array![[1.0, 2.0]];
        let mut down = up.clone();
        let grad = array![[0.3, -0.7]];

        let mut vu = Velocity::zeros(0.9, (1, 2));
        let mut vd = Velocity::zeros(0.9, (1, 2));

        for _ in 0..3 {
            vu.ascend(&mut up, grad.view(), 0.1);
            vd.descend(&mut down, (-&grad).view(), 0.1);
        }

        assert!((&up - &down).iter().all(|d| d.abs() < 1e-12));
    }
}
