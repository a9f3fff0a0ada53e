//! The shared gilt interface.

mod bond;

pub use bond::Gilt;
