pub mod airdrop_store;
