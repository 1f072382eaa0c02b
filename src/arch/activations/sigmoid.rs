/// The logistic function.
///
/// Evaluated with a different expression on each side of zero so that `exp` never overflows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn f(&self, z: f64) -> f64 {
        if z >= 0. {
            1. / (1. + (-z).exp())
        } else {
            let e = z.exp();
            e / (1. + e)
        }
    }

    pub fn df(&self, z: f64) -> f64 {
        let s = self.f(z);
        s * (1. - s)
    }
}
