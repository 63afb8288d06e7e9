// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

pub mod api;
pub use api::*;

pub mod error;
pub use error::*;

pub mod plugins;
pub use plugins::new_key_service;

mod utils;
