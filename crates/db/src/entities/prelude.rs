//! `SeaORM` entity prelude.

pub use super::accounts::Entity as Accounts;
pub use super::bookings::Entity as Bookings;
pub use super::products::Entity as Products;
