//! Common types and utilities for the propfix crates.
//!
//! This crate provides foundational types used across all propfix crates:
//! - Byte spans (`TextSpan`)
//! - Position/Range types and the `LineMap` for line/column conversion
//! - Stable identities for documents and projects
//! - Parser and binder limits

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::TextSpan;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, Range};

// Document/project identity, stable across content changes
pub mod ids;
pub use ids::{DocumentId, ProjectId};

// Centralized limits and thresholds
pub mod limits;
