//! # Promptdeck Architecture
//!
//! Promptdeck is a **UI-agnostic template library**: categories of reusable
//! prompts and saved checkpoints behind a small persistence primitive, with
//! a CLI client on top. The library is the product; the binary is one
//! client of it.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                     │
//! │  - Parses arguments, renders output, owns exit codes       │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                        │
//! │  - Thin facade over commands                               │
//! │  - Normalizes references (names/titles → ids)              │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                             │
//! │  - Business logic, load-mutate-save per operation          │
//! │  - No I/O assumptions whatsoever                           │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                    │
//! │  - KeyValueStore primitive + LibraryStore document owner   │
//! │  - FileKv (production), MemoryKv (testing)                 │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The canonical document
//!
//! One JSON document holds everything: prompt categories, prompts,
//! checkpoint categories, checkpoints. Every operation reads it fresh,
//! mutates it, and writes it back whole, keeping the load-mutate-save
//! boundary explicit and testable; there is no ambient singleton. Last
//! writer wins; there is no cross-writer locking.
//!
//! Two integrity policies coexist on purpose:
//!
//! - locally-persisted state is healed **leniently**
//!   ([`model::Library::normalize`] silently drops orphaned items);
//! - imported documents are checked **strictly** ([`validate`]) and rejected
//!   with the specific violated rule.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`commands`]: business logic per operation family
//! - [`store`]: the persistence primitive and the document owner
//! - [`model`]: wire types, the seed library, the normalize pass
//! - [`validate`]: the strict import gate
//! - [`composer`]: the host text-input adapter seam
//! - [`id`]: collision-resistant string ids
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod composer;
pub mod error;
pub mod id;
pub mod model;
pub mod store;
pub mod validate;
