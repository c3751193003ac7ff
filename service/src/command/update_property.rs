//! [`Command`] for updating a [`Property`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{Address, Description, Name};
use crate::{
    domain::{property, user, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the details of a [`Property`].
///
/// Omitted fields keep their stored values.
#[derive(Clone, Debug)]
pub struct UpdateProperty {
    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Property`] to update.
    pub property_id: property::Id,

    /// New [`Name`] of the [`Property`].
    pub name: Option<property::Name>,

    /// New [`Address`] of the [`Property`].
    pub address: Option<property::Address>,

    /// New [`Description`] of the [`Property`].
    pub description: Option<property::Description>,

    /// New active flag of the [`Property`].
    pub is_active: Option<bool>,
}

impl<Db> Command<UpdateProperty> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, (user::Id, property::Id)>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Update<Property>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProperty {
            owner_id,
            property_id,
            name,
            address,
            description,
            is_active,
        } = cmd;

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

        let property = Property {
            name: name.unwrap_or(property.name),
            address: address.unwrap_or(property.address),
            description: description.unwrap_or(property.description),
            is_active: is_active.unwrap_or(property.is_active),
            ..property
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`UpdateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist or is not owned by
    /// the requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}
