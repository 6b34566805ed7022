pub mod keys;
#[cfg(test)]
pub mod memory_storage;
pub mod object_storage;
pub mod pet_store;
pub mod s3_storage;
