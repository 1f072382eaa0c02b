#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Relu;

impl Relu {
    pub fn f(&self, z: f64) -> f64 {
        z.max(0.)
    }

    pub fn df(&self, z: f64) -> f64 {
        if z > 0. { 1. } else { 0. }
    }
}

/// A rectifier that lets a small slope through for negative inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeakyRelu {
    slope: f64,
}

impl LeakyRelu {
    pub const DEFAULT_SLOPE: f64 = 0.01;

    pub fn new(slope: f64) -> Self {
        Self { slope }
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn f(&self, z: f64) -> f64 {
        if z > 0. { z } else { self.slope * z }
    }

    pub fn df(&self, z: f64) -> f64 {
        if z > 0. { 1. } else { self.slope }
    }
}

impl Default for LeakyRelu {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SLOPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu() {
        assert_eq!(Relu.f(-3.), 0.);
        assert_eq!(Relu.f(2.5), 2.5);
        assert_eq!(Relu.df(-3.), 0.);
        assert_eq!(Relu.df(2.5), 1.);
    }

    #[test]
    fn leaky_relu() {
        let act = LeakyRelu::new(0.1);
        assert_eq!(act.f(-2.), -0.2);
        assert_eq!(act.f(4.), 4.);
        assert_eq!(act.df(-2.), 0.1);
        assert_eq!(act.df(4.), 1.);
    }
}
