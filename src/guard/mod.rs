//! Guarded callables
//!
//! A [`Guard`] pairs a user callback with a [`Contract`](crate::schema::Contract).
//! Arguments are validated and coerced before the callback runs; the
//! result is checked afterwards when a return descriptor is configured.

mod builder;
mod dispatcher;
mod reply;
mod returns;

pub use builder::GuardBuilder;
pub use dispatcher::Guard;
pub use reply::Reply;
pub use returns::check_return;
