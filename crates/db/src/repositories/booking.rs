//! Booking repository for database operations.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    Statement, TransactionTrait,
};
use uuid::Uuid;

use super::company_owner;
use crate::entities::{bookings, sea_orm_active_enums::BookingStatus as DbBookingStatus};
use ridebook_core::booking::{
    Booking, BookingChanges, BookingError, BookingRepository as BookingRepoTrait, BookingStatus,
    NewBooking,
};

/// Booking repository implementation.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    db: DatabaseConnection,
}

impl BookingRepository {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl BookingRepoTrait for BookingRepository {
    async fn create(
        &self,
        input: NewBooking,
        reject_overlaps: bool,
    ) -> Result<Booking, BookingError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        if reject_overlaps {
            lock_company(&txn, &input.company_name).await.map_err(repo_err)?;
            let last_day = input.end_date.unwrap_or(input.start_date);
            if has_clash(&txn, &input.company_name, input.start_date, last_day, None)
                .await
                .map_err(repo_err)?
            {
                return Err(BookingError::DatesUnavailable);
            }
        }

        let now = chrono::Utc::now().into();
        let active_model = bookings::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(input.owner_id),
            company_name: Set(input.company_name),
            full_name: Set(input.full_name),
            email: Set(input.email),
            phone: Set(input.phone),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            time: Set(input.time),
            comments: Set(input.comments),
            origin: Set(input.origin),
            destination: Set(input.destination),
            price: Set(input.price),
            distance: Set(input.distance),
            status: Set(DbBookingStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        let model = bookings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_by_company(
        &self,
        company_name: &str,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, BookingError> {
        let mut query =
            bookings::Entity::find().filter(bookings::Column::CompanyName.eq(company_name));

        if let Some(status) = status {
            query = query.filter(bookings::Column::Status.eq(to_db_status(status)));
        }

        let models = query
            .order_by_asc(bookings::Column::StartDate)
            .order_by_asc(bookings::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| BookingError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BookingChanges,
        reject_overlaps: bool,
    ) -> Result<Option<Booking>, BookingError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let Some(mut existing) = find_row(&txn, id).await.map_err(repo_err)? else {
            return Ok(None);
        };

        if reject_overlaps {
            lock_company(&txn, &existing.company_name)
                .await
                .map_err(repo_err)?;
            // Re-read under the lock; the dates may have moved meanwhile.
            let Some(locked) = find_row(&txn, id).await.map_err(repo_err)? else {
                return Ok(None);
            };
            existing = locked;

            let start = changes.start_date.unwrap_or(existing.start_date);
            let last_day = changes
                .end_date
                .unwrap_or(existing.end_date)
                .unwrap_or(start);
            if has_clash(&txn, &existing.company_name, start, last_day, Some(id))
                .await
                .map_err(repo_err)?
            {
                return Err(BookingError::DatesUnavailable);
            }
        }

        let mut am: bookings::ActiveModel = existing.into();
        if let Some(v) = changes.full_name {
            am.full_name = Set(v);
        }
        if let Some(v) = changes.email {
            am.email = Set(v);
        }
        if let Some(v) = changes.phone {
            am.phone = Set(v);
        }
        if let Some(v) = changes.start_date {
            am.start_date = Set(v);
        }
        if let Some(v) = changes.end_date {
            am.end_date = Set(v);
        }
        if let Some(v) = changes.time {
            am.time = Set(v);
        }
        if let Some(v) = changes.comments {
            am.comments = Set(v);
        }
        if let Some(v) = changes.origin {
            am.origin = Set(v);
        }
        if let Some(v) = changes.destination {
            am.destination = Set(v);
        }
        if let Some(v) = changes.price {
            am.price = Set(v);
        }
        if let Some(v) = changes.distance {
            am.distance = Set(v);
        }

        let model = am.update(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        Ok(Some(to_domain(model)))
    }

    async fn set_status(
        &self,
        id: Uuid,
        company_name: Option<&str>,
        next: BookingStatus,
    ) -> Result<Option<(BookingStatus, Booking)>, BookingError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        // FOR UPDATE: concurrent status writes of this booking queue here.
        let Some(row) = bookings::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };
        if company_name.is_some_and(|c| row.company_name != c) {
            return Ok(None);
        }

        let previous = from_db_status(row.status);
        previous.transition_to(next)?;
        if previous == next {
            return Ok(Some((previous, to_domain(row))));
        }

        let mut am: bookings::ActiveModel = row.into();
        am.status = Set(to_db_status(next));
        let model = am.update(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        Ok(Some((previous, to_domain(model))))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BookingError> {
        let result = bookings::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| BookingError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_company_owner(&self, company_name: &str) -> Result<Option<Uuid>, BookingError> {
        company_owner(&self.db, company_name)
            .await
            .map_err(|e| BookingError::repository(e.to_string()))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn repo_err(e: DbErr) -> BookingError {
    BookingError::repository(e.to_string())
}

async fn find_row(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<Option<bookings::Model>, DbErr> {
    bookings::Entity::find_by_id(id).one(txn).await
}

/// Serializes guarded writes of one company until the transaction ends.
async fn lock_company(txn: &DatabaseTransaction, company_name: &str) -> Result<(), DbErr> {
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock(hashtext($1))",
        [company_name.into()],
    ))
    .await?;
    Ok(())
}

/// Whether an active booking of the company, other than `ignore`, holds a
/// day in the inclusive range `[start, end]`.
async fn has_clash(
    txn: &DatabaseTransaction,
    company_name: &str,
    start: NaiveDate,
    end: NaiveDate,
    ignore: Option<Uuid>,
) -> Result<bool, DbErr> {
    let mut query = bookings::Entity::find()
        .filter(bookings::Column::CompanyName.eq(company_name))
        .filter(
            bookings::Column::Status.is_in(
                BookingStatus::ALL
                    .into_iter()
                    .filter(|s| s.is_active())
                    .map(to_db_status),
            ),
        )
        .filter(bookings::Column::StartDate.lte(end))
        .filter(
            Condition::any().add(bookings::Column::EndDate.gte(start)).add(
                Condition::all()
                    .add(bookings::Column::EndDate.is_null())
                    .add(bookings::Column::StartDate.gte(start)),
            ),
        );

    if let Some(id) = ignore {
        query = query.filter(bookings::Column::Id.ne(id));
    }

    Ok(query.one(txn).await?.is_some())
}

/// Convert domain status to database enum.
const fn to_db_status(status: BookingStatus) -> DbBookingStatus {
    match status {
        BookingStatus::Pending => DbBookingStatus::Pending,
        BookingStatus::Confirmed => DbBookingStatus::Confirmed,
        BookingStatus::Cancelled => DbBookingStatus::Cancelled,
    }
}

/// Convert database status to domain enum.
const fn from_db_status(status: DbBookingStatus) -> BookingStatus {
    match status {
        DbBookingStatus::Pending => BookingStatus::Pending,
        DbBookingStatus::Confirmed => BookingStatus::Confirmed,
        DbBookingStatus::Cancelled => BookingStatus::Cancelled,
    }
}

/// Convert database model to domain model.
fn to_domain(model: bookings::Model) -> Booking {
    Booking {
        id: model.id,
        full_name: model.full_name,
        email: model.email,
        phone: model.phone,
        start_date: model.start_date,
        end_date: model.end_date,
        time: model.time,
        comments: model.comments,
        origin: model.origin,
        destination: model.destination,
        price: model.price,
        distance: model.distance,
        company_name: model.company_name,
        owner_id: model.owner_id,
        status: from_db_status(model.status),
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_is_bijective() {
        for status in BookingStatus::ALL {
            assert_eq!(from_db_status(to_db_status(status)), status);
        }
    }
}
