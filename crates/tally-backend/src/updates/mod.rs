//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the memory backend's dynamic UPDATE SQL;
//! the same struct serializes directly into the remote backend's PATCH body.
//! Double-`Option` fields distinguish "leave unchanged" (outer `None`) from
//! "set to NULL" (`Some(None)`).

pub mod audit;
pub mod template;
