//! Centralized limits for the parser and binder.

/// Maximum nesting depth for expressions and statements before the parser
/// stops descending and reports an error.
pub const MAX_PARSER_NESTING: u32 = 256;

/// Maximum number of receiver hops followed when computing the static type
/// of a member-access chain (`a.b.c.d...`).
pub const MAX_MEMBER_ACCESS_DEPTH: u32 = 64;
