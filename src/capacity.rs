use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{AddAssign, Sub, SubAssign};

use num_traits::{Bounded, CheckedAdd, Zero};

/// A trait representing an edge capacity, which is always an integer.
pub trait Capacity:
    Copy
    + Sum<Self>
    + Sub<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + Zero
    + Bounded
    + CheckedAdd
    + Debug
    + Display
    + Default
{
}

impl Capacity for i32 {}

impl Capacity for i64 {}

impl Capacity for u32 {}

impl Capacity for u64 {}

impl Capacity for usize {}
