//! Domain entities for the database layer

pub mod fields;
pub mod role;
pub mod user;

pub use fields::{Email, FieldLimits, Username};
pub use role::{effective_admin, role_column_width, UserRole};
pub use user::{NewUser, User, UserOrdering};
