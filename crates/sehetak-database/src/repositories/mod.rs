//! PostgreSQL implementations of the store traits.

pub mod category;
pub mod document;
pub mod sharing;
pub mod user;

pub use category::CategoryRepository;
pub use document::DocumentRepository;
pub use sharing::SharingRepository;
pub use user::UserRepository;

/// Name of the violated constraint, if the error is a database constraint error.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
