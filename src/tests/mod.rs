//! End-to-end decisions through the public API.
