#![forbid(unsafe_code)]

mod content;
mod reconcile;

pub use content::*;
pub use reconcile::*;
