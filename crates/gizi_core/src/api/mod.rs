//! JSON entry points for hosts that speak strings (CLI, bindings).
//!
//! Every function takes a request JSON and returns the response JSON; the
//! `Err` side carries a serialised [`ApiError`].

pub mod json_api;

pub use json_api::{
    assemble_dataset_json, assess_json, reference_table_json, ApiError, AssessmentRequest,
    DatasetResponse, ReferenceRequest, ReferenceResponse, ReferenceRow,
};
