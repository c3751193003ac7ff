//! [`Assignment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        assignment::Target,
        person, property, unit, Assignment,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Converts an `assignments` [`Row`] into an [`Assignment`].
fn from_row(row: &Row) -> Assignment {
    let property_id = row.get::<_, Option<property::Id>>("property_id");
    let unit_id = row.get::<_, Option<unit::Id>>("unit_id");
    Assignment {
        id: row.get("id"),
        person_id: row.get("person_id"),
        target: property_id
            .map(Target::Property)
            .or(unit_id.map(Target::Unit))
            .expect("`assignments` row targets a property or a unit"),
        role: row.get("role"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

/// Splits a [`Target`] into its `(property_id, unit_id)` column values.
fn columns(target: Target) -> (Option<property::Id>, Option<unit::Id>) {
    match target {
        Target::Property(id) => (Some(id), None),
        Target::Unit(id) => (None, Some(id)),
    }
}

impl<C> Database<Select<By<Option<Assignment>, (person::Id, Target)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Assignment>, (person::Id, Target)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (person_id, target) = by.into_inner();

        // Deactivated rows are returned too: assigning the same pair again
        // must reuse them.
        let row = match target {
            Target::Property(property_id) => {
                const SQL: &str = "\
                    SELECT id, person_id, property_id, unit_id, \
                           role, is_active, created_at \
                    FROM assignments \
                    WHERE person_id = $1::UUID \
                      AND property_id = $2::UUID \
                    LIMIT 1";
                self.query_opt(SQL, &[&person_id, &property_id]).await
            }
            Target::Unit(unit_id) => {
                const SQL: &str = "\
                    SELECT id, person_id, property_id, unit_id, \
                           role, is_active, created_at \
                    FROM assignments \
                    WHERE person_id = $1::UUID \
                      AND unit_id = $2::UUID \
                    LIMIT 1";
                self.query_opt(SQL, &[&person_id, &unit_id]).await
            }
        }
        .map_err(tracerr::wrap!())?;

        Ok(row.map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Assignment>, Target>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Assignment>, Target>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let target: Target = by.into_inner();

        let rows = match target {
            Target::Property(property_id) => {
                const SQL: &str = "\
                    SELECT id, person_id, property_id, unit_id, \
                           role, is_active, created_at \
                    FROM assignments \
                    WHERE property_id = $1::UUID \
                    ORDER BY created_at DESC, id";
                self.query(SQL, &[&property_id]).await
            }
            Target::Unit(unit_id) => {
                const SQL: &str = "\
                    SELECT id, person_id, property_id, unit_id, \
                           role, is_active, created_at \
                    FROM assignments \
                    WHERE unit_id = $1::UUID \
                    ORDER BY created_at DESC, id";
                self.query(SQL, &[&unit_id]).await
            }
        }
        .map_err(tracerr::wrap!())?;

        Ok(rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Select<By<Vec<Assignment>, person::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Assignment>, person::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let person_id: person::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, person_id, property_id, unit_id, \
                   role, is_active, created_at \
            FROM assignments \
            WHERE person_id = $1::UUID \
            ORDER BY created_at DESC, id";
        Ok(self
            .query(SQL, &[&person_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Assignment>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Assignment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(assignment))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Assignment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(assignment): Update<Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Assignment {
            id,
            person_id,
            target,
            role,
            is_active,
            created_at,
        } = assignment;
        let (property_id, unit_id) = columns(target);

        // `(person_id, property_id)` and `(person_id, unit_id)` stay guarded
        // by their unique constraints: this upsert only resolves by ID, a
        // duplicate pair insert still fails loudly.
        const SQL: &str = "\
            INSERT INTO assignments (\
                id, person_id, property_id, unit_id, \
                role, is_active, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::VARCHAR, $6::BOOL, \
                $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET role = EXCLUDED.role, \
                is_active = EXCLUDED.is_active";
        self.exec(
            SQL,
            &[
                &id,
                &person_id,
                &property_id,
                &unit_id,
                &role,
                &is_active,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
