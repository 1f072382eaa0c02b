use std::num::NonZeroUsize;

use ndarray::{Array2, Axis, array};
use ndarray_rand::RandomExt;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

use parallel_sgd::{
    arch::{
        Model, NeuralNetwork, OrdinaryLeastSquares, RidgeRegression, activations::ActFn,
        layers::Layer, loss::Mse,
    },
    configs::TrainingConfig,
    training::SgdTrainer,
};

fn linear_data(samples: usize, seed: u64) -> (Array2<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Array2<f64> = Array2::random_using((samples, 2), StandardNormal, &mut rng);
    let y = x.dot(&array![1.5, -2.]).insert_axis(Axis(1));
    (x, y)
}

fn config(epochs: usize, mini_batch_size: usize) -> TrainingConfig {
    TrainingConfig::new(
        NonZeroUsize::new(epochs).unwrap(),
        NonZeroUsize::new(mini_batch_size).unwrap(),
    )
}

#[test]
fn least_squares_metric_never_increases() {
    let (x, y) = linear_data(100, 1);
    let mut model =
        OrdinaryLeastSquares::new(2, 5, 0., 0.001, &mut StdRng::seed_from_u64(2)).unwrap();
    let mut trainer = SgdTrainer::new(config(50, 10), StdRng::seed_from_u64(3));

    let log = trainer.train(&mut model, x.view(), y.view(), &Mse).unwrap();

    assert_eq!(log.errors().dim(), (5, 50));
    assert!(!log.has_non_finite());

    let mean = log.mean();
    for (before, after) in mean.iter().zip(mean.iter().skip(1)) {
        assert!(after <= before, "{after} > {before}");
    }
    assert!(mean[49] < mean[0] / 2.);
}

#[test]
fn zero_penalty_ridge_trains_exactly_like_least_squares() {
    let (x, y) = linear_data(40, 4);

    let mut ols =
        OrdinaryLeastSquares::new(2, 3, 0.9, 0.01, &mut StdRng::seed_from_u64(5)).unwrap();
    let mut ridge =
        RidgeRegression::new(2, 3, 0.9, 0.01, 0., &mut StdRng::seed_from_u64(5)).unwrap();

    let ols_log = SgdTrainer::new(config(20, 8), StdRng::seed_from_u64(6))
        .train(&mut ols, x.view(), y.view(), &Mse)
        .unwrap();
    let ridge_log = SgdTrainer::new(config(20, 8), StdRng::seed_from_u64(6))
        .train(&mut ridge, x.view(), y.view(), &Mse)
        .unwrap();

    assert_eq!(ols_log, ridge_log);
    assert_eq!(ols.beta(), ridge.beta());
}

#[test]
fn least_squares_approaches_the_closed_form() {
    let (x, y) = linear_data(60, 8);
    let beta = OrdinaryLeastSquares::fit(x.view(), y.view()).unwrap();

    let mut model =
        OrdinaryLeastSquares::new(2, 4, 0.5, 0.01, &mut StdRng::seed_from_u64(9)).unwrap();
    SgdTrainer::new(config(300, 6), StdRng::seed_from_u64(10))
        .train(&mut model, x.view(), y.view(), &Mse)
        .unwrap();

    for estimate in model.beta().axis_iter(Axis(1)) {
        assert!((&estimate - &beta).iter().all(|d| d.abs() < 1e-6));
    }
}

#[test]
fn networks_train_through_the_same_loop() {
    let (x, y) = linear_data(20, 11);
    let mut network = NeuralNetwork::new(3, 0.5, 0.002).unwrap();
    network
        .add_layer(Layer::input(2))
        .add_layer(Layer::dense(4, ActFn::leaky_relu(0.1)))
        .add_layer(Layer::output(1, ActFn::identity()));
    network.compile(&mut StdRng::seed_from_u64(12)).unwrap();

    let log = SgdTrainer::new(config(200, 5), StdRng::seed_from_u64(13))
        .train(&mut network, x.view(), y.view(), &Mse)
        .unwrap();

    assert_eq!(log.errors().dim(), (3, 200));
    assert!(!log.has_non_finite());
    assert_eq!(network.parallel_runs(), 3);

    let first = log.errors().column(0).to_owned();
    let last = log.errors().column(199).to_owned();
    for (first, last) in first.iter().zip(&last) {
        assert!(last < first, "{last} >= {first}");
    }
}
