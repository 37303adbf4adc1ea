use crate::domain::{
    authors::AuthorDirectory,
    publication::{lifecycle::Lifecycle, service::PublicationService},
    repository::PublicationRepository,
};

pub mod authors;
pub mod publication;
pub mod repository;

//// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type R: PublicationRepository;
    type A: AuthorDirectory;

    /// The only authorized writer of publication status
    fn lifecycle(&self) -> &Lifecycle<Self::R>;

    fn publications(&self) -> &PublicationService<Self::R, Self::A>;
}
