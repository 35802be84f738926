//! CosmicHub - Astrology Content & Commerce Backend
//!
//! This crate implements the credit ledger, referral-gated unlocks, rarity
//! scoring, and payment reconciliation behind the CosmicHub web application.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
