//! Document domain module.
//!
//! - `model`: the uploaded document (`Document`)
//! - `kind`: the upload allow-list (`DocumentKind`)

mod kind;
mod model;

pub use kind::{DocumentKind, SUPPORTED_EXTENSIONS};
pub use model::Document;
