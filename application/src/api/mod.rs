//! GraphQL API definitions.

pub mod assignment;
mod mutation;
pub mod person;
pub mod property;
mod query;
pub mod rental;
pub mod report;
pub mod scalar;
pub mod settings;
pub mod unit;
pub mod user;

use crate::define_error;

pub use self::{
    assignment::Assignment, mutation::Mutation, person::Person,
    property::Property, query::Query, rental::Rental, unit::Unit, user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<crate::Context>,
>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}

define_error! {
    enum ValidationError {
        #[code = "INVALID_MONTH"]
        #[status = BAD_REQUEST]
        #[message = "`month` must be within `1..=12`"]
        InvalidMonth,

        #[code = "INVALID_YEAR"]
        #[status = BAD_REQUEST]
        #[message = "`year` must be within `1..=9999`"]
        InvalidYear,

        #[code = "INVALID_YEARS"]
        #[status = BAD_REQUEST]
        #[message = "`years` must be within `1..=100`"]
        InvalidYears,

        #[code = "AMBIGUOUS_ASSIGNMENT_TARGET"]
        #[status = BAD_REQUEST]
        #[message = "Exactly one of `propertyId`/`unitId` must be provided"]
        AmbiguousAssignmentTarget,

        #[code = "INVALID_EXPENSE_RATIO"]
        #[status = BAD_REQUEST]
        #[message = "Operating expense ratio must be within `0..=100`"]
        InvalidExpenseRatio,

        #[code = "INVALID_VALUATION_PARAMETERS"]
        #[status = BAD_REQUEST]
        #[message = "Valuation parameters must be provided all together or \
                     not at all"]
        PartialValuationParameters,
    }
}
