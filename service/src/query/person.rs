//! [`Query`] collection related to a single [`Person`].

use common::operations::By;

use crate::domain::{person, user, Person};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Person`] by its [`person::Id`], scoped to the owning
/// [`user::Id`].
///
/// Foreign and missing [`Person`]s are indistinguishable: both resolve to
/// [`None`].
pub type ById = DatabaseQuery<By<Option<Person>, (user::Id, person::Id)>>;
