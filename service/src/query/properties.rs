//! [`Query`] collection related to multiple [`Property`]s.

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries a [`read::property::list::Page`] by the provided
/// [`read::property::list::Selector`].
pub type List = DatabaseQuery<
    By<read::property::list::Page, read::property::list::Selector>,
>;

/// Queries the [`read::property::list::TotalCount`] of a [`user::Id`]'s
/// [`Property`]s.
pub type TotalCount =
    DatabaseQuery<By<read::property::list::TotalCount, user::Id>>;
