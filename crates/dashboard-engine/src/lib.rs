//! Orchestration for the country dashboard service.
//!
//! - [`IsoValidator`] guards registration writes.
//! - [`Aggregator`] builds a populated dashboard from the upstream providers.
//! - [`Dispatcher`] fans lifecycle events out to webhook subscribers.
//!
//! Every component receives its collaborators through its constructor; there
//! is no global client state.

pub mod aggregator;
pub mod dispatcher;
pub mod error;
pub mod shape;
pub mod validator;

pub use aggregator::Aggregator;
pub use dispatcher::Dispatcher;
pub use error::{AggregationError, ValidationError};
pub use validator::IsoValidator;

#[cfg(any(test, feature = "testing"))]
pub mod fakes;
