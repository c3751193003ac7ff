//! [`Command`] for adding a new [`Unit`] to a [`Property`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::unit::{Kind, Name, Size};
use crate::{
    domain::{property, unit, user, Property, Unit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Unit`] to a [`Property`].
#[derive(Clone, Debug)]
pub struct CreateUnit {
    /// ID of the [`User`] owning the target [`Property`].
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Property`] the new [`Unit`] belongs to.
    pub property_id: property::Id,

    /// [`Name`] of a new [`Unit`].
    pub name: unit::Name,

    /// [`Kind`] of a new [`Unit`].
    pub kind: unit::Kind,

    /// Standard monthly rent of a new [`Unit`]. Must be positive.
    pub monthly_rent: Money,

    /// Standard monthly utilities of a new [`Unit`], if any.
    pub monthly_utilities: Option<Money>,

    /// Free-text [`Size`] of a new [`Unit`].
    pub size: Option<unit::Size>,
}

impl<Db> Command<CreateUnit> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, (user::Id, property::Id)>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Unit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Unit;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUnit {
            owner_id,
            property_id,
            name,
            kind,
            monthly_rent,
            monthly_utilities,
            size,
        } = cmd;

        if monthly_rent.is_zero() {
            return Err(tracerr::new!(E::NonPositiveRent));
        }

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new((
                owner_id,
                property_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let unit = Unit {
            id: unit::Id::new(),
            property_id: property.id,
            name,
            kind,
            monthly_rent,
            monthly_utilities,
            size,
            is_active: true,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(unit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(unit)
    }
}

/// Error of [`CreateUnit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided standard monthly rent is not positive.
    #[display("Standard monthly rent must be positive")]
    NonPositiveRent,

    /// [`Property`] with the provided ID does not exist or is not owned by
    /// the requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}
