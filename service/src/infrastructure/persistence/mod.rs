pub mod memory;
pub mod postgres;

pub use memory::InMemoryPublicationRepository;
pub use postgres::PostgresPublicationRepository;
