mod rem;
mod strided_slice;

pub use rem::{Rem, RemMode};
pub use strided_slice::StridedSlice;
