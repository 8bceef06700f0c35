//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for parameter lists (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec sized for decorator lists (usually <2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
