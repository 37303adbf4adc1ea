use crate::domain::{
    AppState,
    authors::AuthorDirectory,
    publication::{lifecycle::Lifecycle, service::PublicationService},
    repository::PublicationRepository,
};

pub mod authors;
pub mod http;
pub mod persistence;
pub mod settings;

#[derive(Clone, Debug)]
pub struct AppStateImpl<R, A> {
    lifecycle: Lifecycle<R>,
    publications: PublicationService<R, A>,
}

impl<R: PublicationRepository, A: AuthorDirectory> AppStateImpl<R, A> {
    pub fn new(repository: R, authors: A) -> Self {
        Self {
            lifecycle: Lifecycle::new(repository.clone()),
            publications: PublicationService::new(repository, authors),
        }
    }
}

impl<R: PublicationRepository, A: AuthorDirectory> AppState for AppStateImpl<R, A> {
    type R = R;
    type A = A;

    fn lifecycle(&self) -> &Lifecycle<Self::R> {
        &self.lifecycle
    }

    fn publications(&self) -> &PublicationService<Self::R, Self::A> {
        &self.publications
    }
}
