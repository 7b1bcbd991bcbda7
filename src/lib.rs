//! Shuttergate - Request Throttling for Public Image Views
//!
//! This crate implements the admission-control layer that fronts a
//! photo-sharing application's publicly reachable, unauthenticated routes.
//! It applies a per-client fixed-window rate limit to image view pages and
//! rejects over-limit requests with HTTP 429 before they reach the
//! application handlers. Counters are in-process only; when multiple
//! instances run, each enforces its own limit.

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
