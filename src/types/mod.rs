//! Data types shared by the selection and viewport engines.

mod rectangle;
mod selection;

pub use rectangle::*;
pub use selection::*;
