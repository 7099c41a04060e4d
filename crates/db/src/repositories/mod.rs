//! Repository implementations for data access.
//!
//! Each repository implements the matching persistence trait from
//! `ridebook-core`, hiding the `SeaORM` details from the services.

pub mod account;
pub mod booking;
pub mod product;

pub use account::AccountRepository;
pub use booking::BookingRepository;
pub use product::ProductRepository;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::accounts;

/// Resolves a company slug to the ID of the account that registered it.
pub(crate) async fn company_owner(
    db: &DatabaseConnection,
    company_name: &str,
) -> Result<Option<Uuid>, DbErr> {
    accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .filter(accounts::Column::CompanyName.eq(company_name))
        .into_tuple::<Uuid>()
        .one(db)
        .await
}
