// src/lib.rs

//! # Base Verify Demo
//!
//! Building blocks for gating an airdrop on a Base Verify verification.
//!
//! ## Architecture Overview
//! 1. **Message Layer**: sign-in message builder, parser and the resource URN codec
//! 2. **Wallet Layer**: signers, signature generation and the short-lived signature cache
//! 3. **Services Layer**: trait validation, the Base Verify client and the API server
//! 4. **Storage Layer**: airdrop claim registry

pub mod message;  // Sign-in messages and resource URNs
pub mod models;   // Data structures
pub mod services; // Validation, Base Verify client and API
pub mod settings; // Configuration loading
pub mod storage;  // Airdrop claims
pub mod utils;    // Signature helpers
pub mod wallet;   // Signing and signature caching
