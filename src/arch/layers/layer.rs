use std::fmt::{self, Display};

use ndarray::ArrayView3;

use super::{Dense, DeltaFn, Input, Output};
use crate::arch::activations::ActFn;

/// A layer of a `NeuralNetwork`. Layers only know their neighbours through their position in
/// the network.
#[derive(Debug, Clone)]
pub enum Layer {
    Input(Input),
    Dense(Dense),
    Output(Output),
}

impl Layer {
    pub fn input(height: usize) -> Self {
        Self::Input(Input::new(height))
    }

    pub fn dense(height: usize, act_fn: ActFn) -> Self {
        Self::Dense(Dense::new(height, act_fn))
    }

    /// An output layer trained on the squared error.
    pub fn output(height: usize, act_fn: ActFn) -> Self {
        Self::output_with_delta(height, act_fn, DeltaFn::SquaredError)
    }

    pub fn output_with_delta(height: usize, act_fn: ActFn, delta: DeltaFn) -> Self {
        Self::Output(Output::new(height, act_fn, delta))
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Input(l) => l.height(),
            Self::Dense(l) => l.height(),
            Self::Output(l) => l.dense().height(),
        }
    }

    /// The trainable part of the layer, `None` for the input layer.
    pub fn as_dense(&self) -> Option<&Dense> {
        match self {
            Self::Input(_) => None,
            Self::Dense(l) => Some(l),
            Self::Output(l) => Some(l.dense()),
        }
    }

    pub(crate) fn as_dense_mut(&mut self) -> Option<&mut Dense> {
        match self {
            Self::Input(_) => None,
            Self::Dense(l) => Some(l),
            Self::Output(l) => Some(l.dense_mut()),
        }
    }

    /// The activations cached by the last forward pass.
    pub(crate) fn activations(&self) -> ArrayView3<'_, f64> {
        match self {
            Self::Input(l) => l.activations(),
            Self::Dense(l) => l.activations(),
            Self::Output(l) => l.dense().activations(),
        }
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(l) => write!(f, "Input({})", l.height()),
            Self::Dense(l) => write!(f, "Dense({}, {})", l.height(), l.act_fn()),
            Self::Output(l) => write!(f, "Output({}, {})", l.dense().height(), l.dense().act_fn()),
        }
    }
}
