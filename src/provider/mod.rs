//! LLM provider abstraction for suggest.
//!
//! Every backend implements the [`ChatProvider`] capability over the unified
//! chat protocol in [`crate::message`]. [`resolve_model`] decides which
//! backend serves a model name and [`provider_for`] builds its adapter.

mod client;
mod gemini;
mod kind;
mod listing;
mod ollama;
mod openai;
mod resolve;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{provider_for, ChatProvider};
pub use kind::ProviderKind;
pub use listing::{cacheable, fetch_models, reachable_providers, refresh_models};
pub use resolve::{resolve_model, ModelSelection};
