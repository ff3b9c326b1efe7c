//! JSON response body writer for the Nexus REST server.
//!
//! [`JsonMessageBodyWriter`] picks the [`ObjectWriter`] for every response entity: the shared
//! default writer, a writer for a mapper supplied by a [`MapperContextResolver`], or a writer
//! built by a [`WriterStrategy`] registered for the resource method or class. Views declared for
//! the method or class narrow the chosen writer before the entity is streamed.

pub mod body_writer;
pub mod error;
pub mod generic_type;
pub mod mapper;
pub mod media_type;
pub mod metadata;
pub mod spi;
pub mod strategy;
pub mod view;
pub mod writer;

#[cfg(test)]
mod test_util;

pub use body_writer::*;
pub use error::*;
pub use generic_type::*;
pub use mapper::*;
pub use media_type::*;
pub use metadata::*;
pub use spi::*;
pub use strategy::*;
pub use view::*;
pub use writer::*;
