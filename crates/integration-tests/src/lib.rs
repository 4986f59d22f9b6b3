//! Integration tests for the Vivaha back office.
//!
//! # Running Tests
//!
//! ```bash
//! # Point the suite at a live bureau backend
//! export VIVAHA_API_BASE_URL=https://staging.bureau.example
//! export VIVAHA_API_TOKEN=...
//!
//! # Run integration tests (they are #[ignore]d by default)
//! cargo test -p vivaha-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `backoffice_workflow` - roster fetch, diff-and-persist round trips,
//!   and the assignment sub-flow against a live backend
//!
//! Unit coverage of the pure workflow logic lives next to the code in
//! `vivaha-core` and `vivaha-backoffice`; this crate only holds what
//! genuinely needs a backend.
