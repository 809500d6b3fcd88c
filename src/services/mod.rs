// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod gear;
pub mod strava;
pub mod sync;

pub use gear::{GearService, GearStats, GearUpdate};
pub use strava::{OAuthIntent, StravaClient, StravaService};
pub use sync::{ActivitySync, SyncResult};
