//! Bit-flip mutators from the "Fuzzing Like a Caveman" blog posts, kept
//! behaviorally faithful to the posts so the two variants can be raced
//! against each other and against the C ABI surface in `bit_flipper`.

pub mod mutator;
pub mod rng;

pub use mutator::{BitFlipper, FLIP_ARRAY, FLIP_RATE, MARGIN};
pub use rng::{DEFAULT_SEED, XorShift64};
