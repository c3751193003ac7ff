//! [`Query`] collection related to a single [`Property`].

use common::operations::By;

use crate::domain::{property, user, Property};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Property`] by its [`property::Id`], scoped to the owning
/// [`user::Id`].
///
/// Foreign and missing [`Property`]s are indistinguishable: both resolve to
/// [`None`].
pub type ById = DatabaseQuery<By<Option<Property>, (user::Id, property::Id)>>;
