use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// A source of numeric values for the free variables of an expression.
///
/// Implemented for the usual map types and for [`crate::Assignment`], whose
/// bindings are the nominal values of its measurements.
pub trait Bindings {
    /// Value bound to `name`, if any
    fn value_of(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Bindings for HashMap<&str, f64, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher> Bindings for HashMap<String, f64, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for indexmap::IndexMap<String, f64, FxBuildHasher> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for [(&str, f64)] {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.iter().find(|(n, _)| *n == name).map(|&(_, v)| v)
    }
}

impl<const N: usize> Bindings for [(&str, f64); N] {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.as_slice().value_of(name)
    }
}
