//! Initial database migration.
//!
//! Creates the enums, the accounts, products and bookings tables, their
//! indexes, and the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(BOOKINGS_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_role AS ENUM ('user', 'admin', 'superadmin');

CREATE TYPE booking_status AS ENUM ('Pending', 'Confirmed', 'Cancelled');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id              UUID PRIMARY KEY,
    first_name      VARCHAR(100) NOT NULL,
    last_name       VARCHAR(100) NOT NULL,
    email           VARCHAR(255) NOT NULL,
    company_name    VARCHAR(100) NOT NULL,
    password_hash   TEXT NOT NULL,
    role            account_role NOT NULL DEFAULT 'admin',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT accounts_email_key UNIQUE (email),
    CONSTRAINT accounts_company_name_key UNIQUE (company_name),
    CONSTRAINT accounts_email_lowercase CHECK (email = LOWER(email)),
    CONSTRAINT accounts_company_name_slug CHECK (company_name ~ '^[a-z0-9]+(-[a-z0-9]+)*$')
);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id              UUID PRIMARY KEY,
    owner_id        UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    product_name    VARCHAR(200) NOT NULL,
    description     TEXT NOT NULL,
    price           NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
    images          TEXT[] NOT NULL DEFAULT '{}',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_products_owner ON products(owner_id, created_at);
";

const BOOKINGS_SQL: &str = r"
CREATE TABLE bookings (
    id              UUID PRIMARY KEY,
    owner_id        UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    company_name    VARCHAR(100) NOT NULL,
    full_name       VARCHAR(200) NOT NULL,
    email           VARCHAR(255) NOT NULL,
    phone           VARCHAR(50) NOT NULL,
    start_date      DATE NOT NULL,
    end_date        DATE,
    time            VARCHAR(20) NOT NULL,
    comments        TEXT,
    origin          VARCHAR(500) NOT NULL,
    destination     VARCHAR(500) NOT NULL,
    price           NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
    distance        NUMERIC(10, 2) NOT NULL CHECK (distance >= 0),
    status          booking_status NOT NULL DEFAULT 'Pending',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT bookings_date_range CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE INDEX idx_bookings_company_start ON bookings(company_name, start_date, created_at);
CREATE INDEX idx_bookings_company_status ON bookings(company_name, status);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_accounts_updated_at
    BEFORE UPDATE ON accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_products_updated_at
    BEFORE UPDATE ON products
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_bookings_updated_at
    BEFORE UPDATE ON bookings
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS bookings CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;
DROP TYPE IF EXISTS booking_status;
DROP TYPE IF EXISTS account_role;
";
