// Job-description handling: normalisation ahead of skill extraction.

pub mod cleaner;

pub use cleaner::clean_job_description;
