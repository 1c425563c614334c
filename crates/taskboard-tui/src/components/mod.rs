pub mod form;
pub mod popup;

pub use form::*;
pub use popup::*;
