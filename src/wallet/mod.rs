pub mod key_management;
pub mod signature_cache;
pub mod signature_generator;
