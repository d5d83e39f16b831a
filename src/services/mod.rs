// Service exports
pub mod accounts;
pub mod codec;
pub mod flatfile;
pub mod media;
pub mod memory;
pub mod sessions;
pub mod store;

pub use accounts::AccountError;
pub use flatfile::CsvStore;
pub use media::MediaResolver;
pub use memory::InMemoryStore;
pub use sessions::{SessionCache, SessionKey, SessionStats};
pub use store::{
    resolve_shelter, AdopterStore, AdoptionStore, PetCatalog, ShelterStore, StoreError,
};
