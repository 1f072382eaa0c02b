pub mod activations;
mod builder;
pub mod layers;
mod linear;
pub mod loss;
mod model;
mod network;

pub use builder::ModelBuilder;
pub use linear::{OrdinaryLeastSquares, RidgeRegression};
pub use model::Model;
pub use network::NeuralNetwork;
