//! # healthlens-core
//!
//! Client-side session state machines for HealthLens.
//!
//! This crate provides:
//! - `RequestLifecycle`, the submit → pending → settled pattern both
//!   features share
//! - `PredictionSession` and `ChatSession`, each updated only through one
//!   message per operation and returning the `Effect` to execute
//! - The two service traits and a `driver` that executes effects
//! - Pure view models for front ends
//!
//! ## Usage
//!
//! ```rust,ignore
//! use healthlens_core::{chat::{ChatMsg, ChatSession}, driver::Services};
//!
//! let mut chat = ChatSession::new();
//! chat.update(ChatMsg::UpdateDraft("I feel anxious".into()));
//! if let Some(effect) = chat.update(ChatMsg::Submit) {
//!     let settlement = services.execute(effect).await;
//!     healthlens_core::driver::apply(settlement, &mut prediction, &mut chat);
//! }
//! ```

pub mod chat;
pub mod driver;
pub mod effect;
pub mod lifecycle;
pub mod prediction;
pub mod traits;
pub mod view;

pub use chat::{ChatMsg, ChatSession};
pub use driver::{Services, Settlement};
pub use effect::Effect;
pub use prediction::{PredictionMsg, PredictionSession};
