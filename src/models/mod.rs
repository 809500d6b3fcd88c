// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod gear;
pub mod user;

pub use activity::{Activity, LatLng};
pub use gear::{Gear, GearType};
pub use user::{User, UserTokens};
