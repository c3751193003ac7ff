//! Domain entity definitions.

pub mod assignment;
pub mod person;
pub mod property;
pub mod rental;
pub mod settings;
pub mod unit;
pub mod user;

pub use self::{
    assignment::Assignment, person::Person, property::Property, rental::Rental,
    settings::Settings, unit::Unit, user::User,
};
