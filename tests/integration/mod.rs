//! Integration Tests Module
//!
//! End-to-end tests for the plan relay: repair properties, execution against
//! mock stdio providers, and the HTTP movie catalog.

// Mock providers and helpers
mod support;


// Execution loop against mock stdio providers
mod execution_test;

// Remote catalog over HTTP JSON-RPC
mod movies_http_test;
