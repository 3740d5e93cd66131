use core::fmt::Debug;

/// A trait representing an external vertex label.
pub trait Id: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> Id for T {}
