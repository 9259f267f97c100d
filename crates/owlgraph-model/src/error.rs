//! Typed errors for store mutations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The object of a type assertion does not denote a class-like entity.
    #[error("type `{type_name}` for `{name}` does not resolve to a class")]
    TypeMismatch { name: String, type_name: String },

    /// A rename target already denotes a different entity.
    #[error("cannot rename to `{new_name}`: name already in use")]
    NamingConflict { new_name: String },

    /// An entity id that is not in the arena. Internal invariant.
    #[error("unknown entity id {id}")]
    UnknownEntity { id: u32 },
}
