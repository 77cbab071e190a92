//! Named collections in a directory.
//!
//! A [`CollectionDir`] maps collection names to JSON Lines files under one
//! root. [`Collection`] is the untyped handle with array-returning queries;
//! [`TypedCollection`] wraps it with serde conversion.

mod dir;
mod handle;
mod typed;

pub use dir::CollectionDir;
pub use handle::Collection;
pub use typed::TypedCollection;
