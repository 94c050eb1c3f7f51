//! HTTP-level integration tests against the in-memory backend.

mod folder_test;
mod helpers;
mod iam_test;
