//! Catalog and content entities managed through the admin CRUD forms.

mod content;
mod model;
mod settings;

pub use content::*;
pub use model::*;
pub use settings::*;
