// Domain Layer - Descriptors, requests, responses and commands

pub mod command;
pub mod context;
pub mod error;
pub mod request;
pub mod response;
pub mod schema;
pub mod volume;

// Re-exports
pub use command::{CommandArg, CommandSpec};
pub use context::{InvocationContext, InvocationId};
pub use error::DomainError;
pub use request::{BoundingBox, DocumentRef, InputValue, LiteralValue, Request};
pub use response::{OutputValue, Response};
pub use schema::{
    Cardinality, Constraint, FieldKind, Format, InputField, OutputField, ProcessDescriptor, Uom,
};
pub use volume::VolumeMapping;
