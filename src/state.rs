use crate::services::{object_storage::ObjectStorage, pet_store::PetStore};
use std::sync::Arc;

/// Shared handles built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage>,
    pub pets: PetStore,
}

impl AppState {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            pets: PetStore::new(storage.clone()),
            storage,
        }
    }
}
