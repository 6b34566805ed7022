pub mod health_handlers;
pub mod pet_handlers;
