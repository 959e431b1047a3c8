//! GST details lookup.

pub mod submitter;

pub use submitter::{DetailsOutcome, DetailsSubmitter, GstDetailsRequest, UPSTREAM_ERROR_MARKER};
