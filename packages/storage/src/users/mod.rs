// ABOUTME: User storage module
// ABOUTME: Lookup and lazy creation of user rows keyed by email

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::UserStorage;
pub use types::{NewUser, User};
