//! Pure processing for inbound church task payloads: validation, slug
//! resolution, and mapping to the submission record. No I/O of its own;
//! the existence probe used for slug uniqueness is passed in by the
//! caller.

mod processor;

pub use processor::{
    TaskError, process_task, slugify, to_submission_record, unique_slug, validate_task,
};
