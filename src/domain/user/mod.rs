// User domain module
// Users, their authorities and the search term used for team formation

#![allow(clippy::module_inception)]

pub mod user;
pub mod value_objects;

pub use user::{TeamSearchUser, User};
pub use value_objects::{Authority, LoginOrName};
