pub mod auth_message;
pub mod signature;
pub mod trait_requirement;
pub mod verification;
pub mod verified_user;
