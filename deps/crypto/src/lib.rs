// Copyright (c) 2022 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! # Crypto
//!
//! This crate encapsulates the local symmetric crypto operations used by
//! envelope encryption. Only the authenticated AES-256-GCM scheme is
//! provided, implemented in pure rust.
//!
//! ## Components
//!
//! This crate include the following public submodules:
//! - `symmetric`: Symmetric key en/decryption
//! - `random`: Fresh keys and nonces from a CSPRNG

mod rust;

pub mod error;
pub use error::*;

mod random;
pub use random::*;

mod symmetric;
pub use symmetric::*;
