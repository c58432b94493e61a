//! # wamdens-types
//!
//! Core data types for the wamdens atmospheric density lookup.
//!
//! This crate provides the fundamental types shared across the lookup
//! pipeline:
//!
//! - **Time labels**: [`label::TimeLabel`], the canonical minute-precision
//!   label embedded in snapshot file names
//! - **Query types**: [`point::QueryPoint`], the 4-D point a single
//!   invocation asks about
//!
//! All types are serializable with Serde and built on top of `chrono`'s
//! naive date-time primitives.
//!
//! ## Examples
//!
//! ```rust
//! use wamdens_types::label::TimeLabel;
//! use chrono::NaiveDateTime;
//!
//! let start: NaiveDateTime = "2023-05-12T16:07:30".parse().unwrap();
//! let label = TimeLabel::from_datetime(start);
//! assert_eq!(label.to_string(), "20230512_160700");
//! ```

pub mod label;
pub mod point;
