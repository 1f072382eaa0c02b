mod ols;
mod ridge;
mod shared;
mod solve;

pub use ols::OrdinaryLeastSquares;
pub use ridge::RidgeRegression;
