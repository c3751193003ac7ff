//! [`Unit`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, unit, user, Unit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Converts a `units` [`Row`] into a [`Unit`].
fn from_row(row: &Row) -> Unit {
    Unit {
        id: row.get("id"),
        property_id: row.get("property_id"),
        name: row.get("name"),
        kind: row.get("kind"),
        monthly_rent: row.get("monthly_rent"),
        monthly_utilities: row.get("monthly_utilities"),
        size: row.get("size"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Unit>, (user::Id, unit::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Unit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Unit>, (user::Id, unit::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (owner_id, id) = by.into_inner();

        // Ownership is transitive through the `Property`; foreign and missing
        // rows resolve identically.
        const SQL: &str = "\
            SELECT u.id, u.property_id, u.name, u.kind, \
                   u.monthly_rent, u.monthly_utilities, u.size, \
                   u.is_active, u.created_at \
            FROM units AS u \
            JOIN properties AS p ON p.id = u.property_id \
            WHERE u.id = $2::UUID \
              AND p.owner_id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&owner_id, &id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Unit>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Unit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Unit>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, property_id, name, kind, \
                   monthly_rent, monthly_utilities, size, \
                   is_active, created_at \
            FROM units \
            WHERE property_id = $1::UUID \
            ORDER BY name, id";
        Ok(self
            .query(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Unit>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(unit): Insert<Unit>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(unit)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Unit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(unit): Update<Unit>,
    ) -> Result<Self::Ok, Self::Err> {
        let Unit {
            id,
            property_id,
            name,
            kind,
            monthly_rent,
            monthly_utilities,
            size,
            is_active,
            created_at,
        } = unit;

        const SQL: &str = "\
            INSERT INTO units (\
                id, property_id, name, kind, \
                monthly_rent, monthly_utilities, size, \
                is_active, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::INT2, \
                $5::NUMERIC, $6::NUMERIC, $7::VARCHAR, \
                $8::BOOL, \
                $9::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                kind = EXCLUDED.kind, \
                monthly_rent = EXCLUDED.monthly_rent, \
                monthly_utilities = EXCLUDED.monthly_utilities, \
                size = EXCLUDED.size, \
                is_active = EXCLUDED.is_active";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &name,
                &kind,
                &monthly_rent,
                &monthly_utilities,
                &size,
                &is_active,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Unit, unit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Unit, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: unit::Id = by.into_inner();

        // Rentals and assignments follow via `ON DELETE CASCADE`.
        const SQL: &str = "\
            DELETE FROM units \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Unit, unit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Unit, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: unit::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO units_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
