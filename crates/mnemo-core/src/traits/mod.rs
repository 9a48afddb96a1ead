// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external services the engine consumes.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod provider;
pub mod store;
pub mod vector;

// Re-export all traits at the traits module level for convenience.
pub use adapter::PluginAdapter;
pub use provider::InferenceAdapter;
pub use store::DocumentStoreAdapter;
pub use vector::VectorIndexAdapter;
