//! Reference data rules: account kinds, users and category trees.

pub mod account;
pub mod category;
pub mod error;
pub mod password;
pub mod user;

pub use account::AccountKind;
pub use category::CategoryTree;
pub use error::{CatalogError, normalize_name};
pub use password::{PasswordError, hash_password};
pub use user::{UserRole, UserScope};
