// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use rand::Rng;
use zeroize::Zeroizing;

use crate::{KEY_LEN, NONCE_LEN};

/// Fill `N` bytes from the thread local CSPRNG. The generator is fetched
/// on every call and is seeded from the OS.
pub fn random_bytes<const N: usize>() -> Vec<u8> {
    let mut buffer = vec![0u8; N];
    rand::rng().fill(&mut buffer[..]);
    buffer
}

/// A fresh 96-bit nonce for one A256GCM operation.
pub fn generate_nonce() -> Vec<u8> {
    random_bytes::<NONCE_LEN>()
}

/// A fresh 256-bit symmetric key.
pub fn generate_key() -> Zeroizing<Vec<u8>> {
    Zeroizing::new(random_bytes::<KEY_LEN>())
}
