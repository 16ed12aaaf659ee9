//! # tally-core
//!
//! Core types and pure logic for Tally, a retail-audit data-collection tool.
//!
//! This crate provides everything the rest of the workspace shares:
//! - Entity structs for the audit domain (templates, sections, questions,
//!   conditional rules, audits, categories, user profiles)
//! - Status and kind enums with state machine transitions
//! - The conditional-question engine (condition evaluation, visibility
//!   resolution, rule-triggered actions)
//! - Audit scoring and response validation
//! - Publish-time template logic checks (rule cycles, ordering)
//! - Cross-cutting error types and CLI response shapes

pub mod engine;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod logic_check;
pub mod responses;
pub mod scoring;
pub mod validate;
pub mod value;
