//! [`Assignment`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{command, domain};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A role assignment of a `Person` to a property or unit.
#[derive(Clone, Debug, From)]
pub struct Assignment(domain::Assignment);

/// A role assignment of a `Person` to a property or unit.
///
/// Exactly one of `propertyId`/`unitId` is set. Removed assignments stay
/// listed with `isActive == false`.
#[graphql_object(context = Context)]
impl Assignment {
    /// Unique identifier of this `Assignment`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Person` this `Assignment` belongs to.
    #[must_use]
    pub fn person(&self) -> api::Person {
        api::Person::from(api::person::Id::from(self.0.person_id))
    }

    /// `Property` this `Assignment` targets, if any.
    #[must_use]
    pub fn property_id(&self) -> Option<api::property::Id> {
        match self.0.target {
            domain::assignment::Target::Property(id) => Some(id.into()),
            domain::assignment::Target::Unit(_) => None,
        }
    }

    /// `Unit` this `Assignment` targets, if any.
    #[must_use]
    pub fn unit_id(&self) -> Option<api::unit::Id> {
        match self.0.target {
            domain::assignment::Target::Unit(id) => Some(id.into()),
            domain::assignment::Target::Property(_) => None,
        }
    }

    /// Role of the `Person` within the target.
    #[must_use]
    pub fn role(&self) -> Role {
        self.0.role.clone().into()
    }

    /// Indicator whether this `Assignment` is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// `DateTime` when this `Assignment` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of an `Assignment`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::assignment::Id)]
#[into(domain::assignment::Id)]
#[graphql(name = "AssignmentId", transparent)]
pub struct Id(Uuid);

/// Free-form role of an `Assignment` (e.g. `caretaker`, `tenant`).
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "AssignmentRole",
    with = scalar::Via::<domain::assignment::Role>,
)]
pub struct Role(domain::assignment::Role);

crate::define_error! {
    enum AssignmentError {
        #[code = "ASSIGNMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "No active `Assignment` exists for the specified pair"]
        NotExists,

        #[code = "ALREADY_ASSIGNED"]
        #[status = BAD_REQUEST]
        #[message = "An `Assignment` for the specified pair already exists"]
        AlreadyExists,
    }
}

impl AsError for command::assign_person::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => {
                // Lost race against a concurrent assignment of the same
                // pair.
                if e.is_unique_violation(Some(
                    "assignments_person_property_key",
                )) || e.is_unique_violation(Some(
                    "assignments_person_unit_key",
                )) {
                    Some(AssignmentError::AlreadyExists.into())
                } else {
                    e.try_as_error()
                }
            }
            Self::PersonNotExists(_) => {
                Some(api::person::PersonError::NotExists.into())
            }
            Self::PropertyNotExists(_) => {
                Some(api::property::PropertyError::NotExists.into())
            }
            Self::UnitNotExists(_) => {
                Some(api::unit::UnitError::NotExists.into())
            }
        }
    }
}

impl AsError for command::unassign_person::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::AssignmentNotExists => Some(AssignmentError::NotExists.into()),
            Self::PersonNotExists(_) => {
                Some(api::person::PersonError::NotExists.into())
            }
        }
    }
}
