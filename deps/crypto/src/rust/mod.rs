// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! Crypto suites implemented by purely rust

pub mod aes256gcm;
