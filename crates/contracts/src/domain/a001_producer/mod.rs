pub mod aggregate;
pub mod cpf;
pub mod form;

pub use aggregate::{NewProducer, Producer, ProducerPatch, ProducerStatus};
pub use form::ProducerForm;
