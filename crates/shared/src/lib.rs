//! Domain types, wire payloads, and the failure taxonomy shared by the
//! scheduling client core and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
