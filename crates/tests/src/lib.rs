//! End-to-end HTTP tests for the transcription service.
//!
//! The router under test is the real one; only the engine behind it is a
//! scripted stand-in, so these tests need no model weights.


#[cfg(test)]
mod health_tests;
#[cfg(test)]
mod transcribe_tests;
