pub mod api_server;
pub mod trait_validator;
pub mod verifier;
