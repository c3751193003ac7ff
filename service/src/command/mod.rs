//! [`Command`] definition.

pub mod assign_person;
pub mod authorize_session;
pub mod create_person;
pub mod create_property;
pub mod create_session;
pub mod create_unit;
pub mod create_user;
pub mod delete_property;
pub mod delete_unit;
pub mod unassign_person;
pub mod update_person;
pub mod update_property;
pub mod update_property_settings;
pub mod update_standard_rent;
pub mod update_unit;
pub mod update_user_password;
pub mod upsert_month_entry;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    assign_person::AssignPerson, authorize_session::AuthorizeSession,
    create_person::CreatePerson, create_property::CreateProperty,
    create_session::CreateSession, create_unit::CreateUnit,
    create_user::CreateUser, delete_property::DeleteProperty,
    delete_unit::DeleteUnit, unassign_person::UnassignPerson,
    update_person::UpdatePerson, update_property::UpdateProperty,
    update_property_settings::UpdatePropertySettings,
    update_standard_rent::UpdateStandardRent, update_unit::UpdateUnit,
    update_user_password::UpdateUserPassword,
    upsert_month_entry::UpsertMonthEntry,
};
