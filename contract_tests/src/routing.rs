//! Routing contract tests
//!
//! Module and action identifiers are part of the public interface; callers
//! hard-code them.
