//! HTTP-level integration tests over the in-memory store.

mod helpers;

mod access_test;
mod bootstrap_test;
mod concurrency_test;
mod invitation_test;
mod scenario_test;
mod session_test;
