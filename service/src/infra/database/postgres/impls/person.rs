//! [`Person`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{person, user, Person},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Converts a `persons` [`Row`] into a [`Person`].
fn from_row(row: &Row) -> Person {
    Person {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        notes: row.get("notes"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Person>, (user::Id, person::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Person>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Person>, (user::Id, person::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (owner_id, id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, owner_id, first_name, last_name, \
                   email, phone, notes, \
                   is_active, created_at \
            FROM persons \
            WHERE id = $2::UUID \
              AND owner_id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&owner_id, &id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Insert<Person>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Person>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(person): Insert<Person>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(person)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Person>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(person): Update<Person>,
    ) -> Result<Self::Ok, Self::Err> {
        let Person {
            id,
            owner_id,
            first_name,
            last_name,
            email,
            phone,
            notes,
            is_active,
            created_at,
        } = person;

        const SQL: &str = "\
            INSERT INTO persons (\
                id, owner_id, first_name, last_name, \
                email, phone, notes, \
                is_active, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, \
                $8::BOOL, \
                $9::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET first_name = EXCLUDED.first_name, \
                last_name = EXCLUDED.last_name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                notes = EXCLUDED.notes, \
                is_active = EXCLUDED.is_active";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &first_name,
                &last_name,
                &email,
                &phone,
                &notes,
                &is_active,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Person, person::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Person, person::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: person::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO persons_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::person::list::Page, read::person::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::person::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::person::list::Page, read::person::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::person::list::Selector {
            arguments,
            filter: read::person::list::Filter { owner_id, name },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &owner_id];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });

        let name_pattern = name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let name_pattern_idx = name_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM persons \
             WHERE owner_id = $2::UUID \
                   {cursor} \
                   {name_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            name_filtering =
                name_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(first_name || ' ' || last_name) \
                         SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get::<_, person::Id>("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::person::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::person::list::TotalCount, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::person::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::person::list::TotalCount, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let owner_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM persons \
            WHERE owner_id = $1::UUID";
        self.query_opt(SQL, &[&owner_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
