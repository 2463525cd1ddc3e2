//! Cross-cutting tests: end-to-end scenarios and property-based
//! invariants. Per-module unit tests live in `#[cfg(test)] mod tests` at the
//! bottom of their own source files instead.
