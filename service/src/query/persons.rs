//! [`Query`] collection related to multiple [`Person`]s.

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{domain::Person, Query};

use super::DatabaseQuery;

/// Queries a [`read::person::list::Page`] by the provided
/// [`read::person::list::Selector`].
pub type List =
    DatabaseQuery<By<read::person::list::Page, read::person::list::Selector>>;

/// Queries the [`read::person::list::TotalCount`] of a [`user::Id`]'s
/// [`Person`]s.
pub type TotalCount =
    DatabaseQuery<By<read::person::list::TotalCount, user::Id>>;
