//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod bookings;
pub mod products;
pub mod sea_orm_active_enums;
