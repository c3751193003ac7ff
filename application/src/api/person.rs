//! [`Person`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{command, domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A person (tenant, caretaker, owner, …) managed by the current `User`.
#[derive(Clone, Debug, From)]
pub struct Person {
    /// ID of this [`Person`].
    id: Id,

    /// Underlying [`domain::Person`].
    person: OnceCell<domain::Person>,
}

impl From<domain::Person> for Person {
    fn from(person: domain::Person) -> Self {
        Self {
            id: person.id.into(),
            person: OnceCell::new_with(Some(person)),
        }
    }
}

impl From<Id> for Person {
    fn from(id: Id) -> Self {
        Self {
            id,
            person: OnceCell::new(),
        }
    }
}

impl Person {
    /// Returns the underlying [`domain::Person`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Person`] doesn't exist or is not owned by the
    /// current `User`.
    async fn person(&self, ctx: &Context) -> Result<&domain::Person, Error> {
        let id = self.id.into();
        self.person
            .get_or_try_init(|| async {
                let my_id = ctx.current_session().await?.user_id;
                ctx.service()
                    .execute(query::person::ById::by((my_id.into(), id)))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(
                            p.ok_or_else(|| PersonError::NotExists.into()),
                        )
                    })
                    .await
            })
            .await
    }
}

/// A person (tenant, caretaker, owner, …) managed by the current `User`.
#[graphql_object(context = Context)]
impl Person {
    /// Unique identifier of this `Person`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// First name of this `Person`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.firstName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn first_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.person(ctx).await?.first_name.clone().into())
    }

    /// Last name of this `Person`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.lastName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn last_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.person(ctx).await?.last_name.clone().into())
    }

    /// Email address of this `Person`, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        Ok(self.person(ctx).await?.email.clone().map(Into::into))
    }

    /// Phone number of this `Person`, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.person(ctx).await?.phone.clone().map(Into::into))
    }

    /// Free-text notes about this `Person`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.notes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn notes(&self, ctx: &Context) -> Result<Notes, Error> {
        Ok(self.person(ctx).await?.notes.clone().into())
    }

    /// Indicator whether this `Person` is active.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.isActive",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.person(ctx).await?.is_active)
    }

    /// `DateTime` when this `Person` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.person(ctx).await?.created_at.coerce())
    }

    /// Assignments of this `Person`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Person.assignments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn assignments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Assignment>, Error> {
        let person = self.person(ctx).await?;
        ctx.service()
            .execute(query::assignments::OfPerson::by(person.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|assignments| {
                assignments.into_iter().map(Into::into).collect()
            })
    }
}

/// Unique identifier of a `Person`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::person::Id)]
#[into(domain::person::Id)]
#[graphql(name = "PersonId", transparent)]
pub struct Id(Uuid);

/// First or last name of a `Person`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "PersonName", with = scalar::Via::<domain::person::Name>)]
pub struct Name(domain::person::Name);

/// Email address of a `Person`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "PersonEmail", with = scalar::Via::<domain::person::Email>)]
pub struct Email(domain::person::Email);

/// Phone number of a `Person`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "PersonPhone", with = scalar::Via::<domain::person::Phone>)]
pub struct Phone(domain::person::Phone);

/// Free-text notes about a `Person`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "PersonNotes", with = scalar::Via::<domain::person::Notes>)]
pub struct Notes(domain::person::Notes);

crate::define_error! {
    enum PersonError {
        #[code = "PERSON_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Person` with the specified ID does not exist"]
        NotExists,
    }
}

pub mod list {
    //! Definitions related to the [`Person`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Person};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Person` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::person::list::Cursor)]
    #[graphql(
        name = "PersonListCursor",
        with = scalar::Via::<read::person::list::Cursor>,
    )]
    pub struct Cursor(pub read::person::list::Cursor);

    /// Edge in the [`Person`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::person::list::Edge);

    /// Edge in the `Person` list.
    #[graphql_object(name = "PersonListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `PersonListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `PersonListEdge`.
        #[must_use]
        pub fn node(&self) -> Person {
            Person {
                id: self.0.node.into(),
                person: tokio::sync::OnceCell::new(),
            }
        }
    }

    /// Connection of the [`Person`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::person::list::Connection);

    /// Connection of the `Person` list.
    #[graphql_object(name = "PersonListConnection", context = Context)]
    impl Connection {
        /// Edges of this `PersonListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::person::list::PageInfo`].
        info: read::person::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `PersonListConnection` page.
    #[graphql_object(name = "PersonListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Person` count of the current `User`.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            let my_id = ctx.current_session().await?.user_id;
            ctx.service()
                .execute(query::persons::TotalCount::by(my_id.into()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}

impl AsError for command::create_person::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_person::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PersonNotExists(_) => Some(PersonError::NotExists.into()),
        }
    }
}
