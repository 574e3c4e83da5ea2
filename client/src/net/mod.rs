//! Browser implementations of the registry I/O seams.
//!
//! SYSTEM CONTEXT
//! ==============
//! `browser` plugs `fetch`, `localStorage` and `window.location` into the
//! shared API client. Outside the `csr` build the same types compile as inert
//! stubs so components and tests build natively.

pub mod browser;
