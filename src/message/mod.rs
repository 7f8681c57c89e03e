pub mod builder;
pub mod parser;
pub mod resources;
pub mod trait_codec;
