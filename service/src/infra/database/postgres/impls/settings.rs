//! [`Settings`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{property, Settings},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Settings>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Settings>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Settings>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT property_id, gross_rent_multiplier, \
                   operating_expense_ratio, value_adjustment, \
                   appreciation_rate, etf_return_rate, comparison_years \
            FROM property_settings \
            WHERE property_id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Settings {
                property_id: row.get("property_id"),
                gross_rent_multiplier: row.get("gross_rent_multiplier"),
                operating_expense_ratio: row.get("operating_expense_ratio"),
                value_adjustment: row.get("value_adjustment"),
                appreciation_rate: row.get("appreciation_rate"),
                etf_return_rate: row.get("etf_return_rate"),
                comparison_years: row.get("comparison_years"),
            }))
    }
}

impl<C> Database<Insert<Settings>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Settings>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(settings): Insert<Settings>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(settings))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Settings>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(settings): Update<Settings>,
    ) -> Result<Self::Ok, Self::Err> {
        let Settings {
            property_id,
            gross_rent_multiplier,
            operating_expense_ratio,
            value_adjustment,
            appreciation_rate,
            etf_return_rate,
            comparison_years,
        } = settings;

        // One row per property at most.
        const SQL: &str = "\
            INSERT INTO property_settings (\
                property_id, gross_rent_multiplier, \
                operating_expense_ratio, value_adjustment, \
                appreciation_rate, etf_return_rate, comparison_years \
            ) VALUES (\
                $1::UUID, $2::NUMERIC, \
                $3::NUMERIC, $4::NUMERIC, \
                $5::NUMERIC, $6::NUMERIC, \
                $7::INT4 \
            ) \
            ON CONFLICT (property_id) DO UPDATE \
            SET gross_rent_multiplier = EXCLUDED.gross_rent_multiplier, \
                operating_expense_ratio = EXCLUDED.operating_expense_ratio, \
                value_adjustment = EXCLUDED.value_adjustment, \
                appreciation_rate = EXCLUDED.appreciation_rate, \
                etf_return_rate = EXCLUDED.etf_return_rate, \
                comparison_years = EXCLUDED.comparison_years";
        self.exec(
            SQL,
            &[
                &property_id,
                &gross_rent_multiplier,
                &operating_expense_ratio,
                &value_adjustment,
                &appreciation_rate,
                &etf_return_rate,
                &comparison_years,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
