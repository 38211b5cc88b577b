//! # calm-core
//!
//! Core types and error types for the CALM training-data ingestion engine.
//!
//! This crate provides the foundational types shared across all CALM crates:
//! - Entity structs for biometric sessions, cognitive results, earnings,
//!   and participant progress
//! - Study enums (lifecycle stage, earnings type, progress status,
//!   experimental condition)
//! - Civil-day helpers for the study's reference time zone
//! - Cross-cutting error types

pub mod civil;
pub mod entities;
pub mod enums;
pub mod errors;
