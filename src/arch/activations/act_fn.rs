use std::fmt::{self, Display};

use ndarray::{Array, ArrayView, Dimension};

use super::{LeakyRelu, Relu, Sigmoid, Softmax};

/// The activation function of a layer, paired with its derivative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Relu(Relu),
    LeakyRelu(LeakyRelu),
    Identity,
    Softmax(Softmax),
}

impl ActFn {
    pub fn sigmoid() -> Self {
        Self::Sigmoid(Sigmoid)
    }

    pub fn relu() -> Self {
        Self::Relu(Relu)
    }

    pub fn leaky_relu(slope: f64) -> Self {
        Self::LeakyRelu(LeakyRelu::new(slope))
    }

    pub fn identity() -> Self {
        Self::Identity
    }

    pub fn softmax() -> Self {
        Self::Softmax(Softmax)
    }

    /// Applies the activation function to the pre-activations `z`.
    pub fn f<D: Dimension>(&self, z: ArrayView<f64, D>) -> Array<f64, D> {
        match self {
            Self::Sigmoid(a) => z.mapv(|z| a.f(z)),
            Self::Relu(a) => z.mapv(|z| a.f(z)),
            Self::LeakyRelu(a) => z.mapv(|z| a.f(z)),
            Self::Identity => z.to_owned(),
            Self::Softmax(a) => a.f(z),
        }
    }

    /// Applies the derivative of the activation function to the pre-activations `z`.
    pub fn df<D: Dimension>(&self, z: ArrayView<f64, D>) -> Array<f64, D> {
        match self {
            Self::Sigmoid(a) => z.mapv(|z| a.df(z)),
            Self::Relu(a) => z.mapv(|z| a.df(z)),
            Self::LeakyRelu(a) => z.mapv(|z| a.df(z)),
            Self::Identity => Array::ones(z.raw_dim()),
            Self::Softmax(a) => a.df(z),
        }
    }
}

impl Display for ActFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sigmoid(_) => write!(f, "sigmoid"),
            Self::Relu(_) => write!(f, "relu"),
            Self::LeakyRelu(a) => write!(f, "leaky_relu({})", a.slope()),
            Self::Identity => write!(f, "identity"),
            Self::Softmax(_) => write!(f, "softmax"),
        }
    }
}

impl Default for ActFn {
    fn default() -> Self {
        Self::sigmoid()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;

    #[test]
    fn identity_passes_through() {
        let z = array![[1., -2.], [3., 0.]];
        assert_eq!(ActFn::identity().f(z.view()), z);
        assert_eq!(ActFn::identity().df(z.view()), Array2::<f64>::ones((2, 2)));
    }

    #[test]
    fn derivatives_match_finite_differences() {
        const H: f64 = 1e-6;
        let z = array![-1.3, -0.2, 0.4, 2.1];
        let act_fns = [ActFn::sigmoid(), ActFn::relu(), ActFn::leaky_relu(0.05), ActFn::identity()];

        for act_fn in act_fns {
            let df = act_fn.df(z.view());
            let numeric = (act_fn.f((&z + H).view()) - act_fn.f((&z - H).view())) / (2. * H);

            for (a, b) in df.iter().zip(&numeric) {
                assert!((a - b).abs() < 1e-6, "{act_fn:?}: {a} != {b}");
            }
        }
    }

    #[test]
    fn default_is_sigmoid() {
        assert_eq!(ActFn::default(), ActFn::sigmoid());
    }
}
