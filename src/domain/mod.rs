//! Domain entities.
//!
//! Entities are plain data: identity, timestamps and fields. Persistence and
//! relationship bookkeeping live in [`crate::store`]; field constraints are
//! enforced by each entity's `validate()` built from [`crate::validate`].

mod address;
mod certificate;
mod client;
mod coach;
mod gym;
mod subscription;

pub use address::Address;
pub use certificate::Certificate;
pub use client::Client;
pub use coach::Coach;
pub use gym::Gym;
pub use subscription::Subscription;
