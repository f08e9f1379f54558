//! Wire format contract tests
//!
//! These tests pin the JSON field names callers depend on.
