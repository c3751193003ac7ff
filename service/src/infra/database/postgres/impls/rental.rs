//! [`Rental`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select, Update},
    Month, Year, YearMonth,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{unit, Rental},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Converts a `rentals` [`Row`] into a [`Rental`].
fn from_row(row: &Row) -> Rental {
    Rental {
        id: row.get("id"),
        unit_id: row.get("unit_id"),
        month: row.get("month"),
        year: row.get("year"),
        rent: row.get("rent"),
        utilities: row.get("utilities"),
        amount: row.get("amount"),
        is_paid: row.get("is_paid"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<Rental>, (unit::Id, Year)>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, (unit::Id, Year)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (unit_id, year) = by.into_inner();

        const SQL: &str = "\
            SELECT id, unit_id, month, year, \
                   rent, utilities, amount, \
                   is_paid, notes, created_at \
            FROM rentals \
            WHERE unit_id = $1::UUID \
              AND year = $2::INT4 \
            ORDER BY month";
        Ok(self
            .query(SQL, &[&unit_id, &year])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<Rental>, (unit::Id, Month, Year)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, (unit::Id, Month, Year)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (unit_id, month, year) = by.into_inner();

        const SQL: &str = "\
            SELECT id, unit_id, month, year, \
                   rent, utilities, amount, \
                   is_paid, notes, created_at \
            FROM rentals \
            WHERE unit_id = $1::UUID \
              AND month = $2::INT2 \
              AND year = $3::INT4 \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&unit_id, &month, &year])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Rental>, (unit::Id, YearMonth)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, (unit::Id, YearMonth)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (unit_id, since) = by.into_inner();
        let (year, month) = (since.year, since.month);

        // All rows at or after the `since` month, chronologically.
        const SQL: &str = "\
            SELECT id, unit_id, month, year, \
                   rent, utilities, amount, \
                   is_paid, notes, created_at \
            FROM rentals \
            WHERE unit_id = $1::UUID \
              AND (year > $2::INT4 \
                   OR (year = $2::INT4 AND month >= $3::INT2)) \
            ORDER BY year, month";
        Ok(self
            .query(SQL, &[&unit_id, &year, &month])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Rental>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Rental>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(rental)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rental {
            id,
            unit_id,
            month,
            year,
            rent,
            utilities,
            amount,
            is_paid,
            notes,
            created_at,
        } = rental;

        // `(unit_id, month, year)` stays guarded by the
        // `rentals_unit_month_year_key` constraint: this upsert only resolves
        // by ID, a duplicate month insert still fails loudly.
        const SQL: &str = "\
            INSERT INTO rentals (\
                id, unit_id, month, year, \
                rent, utilities, amount, \
                is_paid, notes, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::INT4, \
                $5::NUMERIC, $6::NUMERIC, $7::NUMERIC, \
                $8::BOOL, $9::VARCHAR, \
                $10::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET rent = EXCLUDED.rent, \
                utilities = EXCLUDED.utilities, \
                amount = EXCLUDED.amount, \
                is_paid = EXCLUDED.is_paid, \
                notes = EXCLUDED.notes";
        self.exec(
            SQL,
            &[
                &id, &unit_id, &month, &year, &rent, &utilities, &amount,
                &is_paid, &notes, &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
