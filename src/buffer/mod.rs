mod matrix;

pub use self::matrix::*;
