//! Product catalog module.
//!
//! The catalog itself is owned elsewhere; this module only describes the
//! lookup the cart and checkout pipeline depend on.

mod product;

pub use product::{Catalog, InMemoryCatalog, Product};
