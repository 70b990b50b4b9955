//! # FLARE Quality
//!
//! Keeps frame time bounded by trading effect richness for speed.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    QUALITY CONTROL LOOP                     │
//! ├────────────────────────────────────────────────────────────┤
//! │  frame-rate samples ──► ring (10) ──► mean                  │
//! │                                         │                   │
//! │        cooldown (2s) ──────────────────►│ decide            │
//! │                                         ▼                   │
//! │  Low ◄──► Medium ◄──► High ◄──► Ultra   (one step at a time)│
//! │                                         │                   │
//! │                                   EffectBudget              │
//! │                                         │                   │
//! │  create request ──► can_admit(category, priority)           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The emergency path (instantaneous fps below 20) skips the cooldown and
//! drops straight to `Low`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod budget;
pub mod config;
pub mod controller;
pub mod level;

pub use budget::{ActiveEffectCounts, EffectBudget};
pub use config::QualityConfig;
pub use controller::{PerformanceSample, QualityController, QualityDecision};
pub use level::{QualityLevel, QualityParams};
