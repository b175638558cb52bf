// Interview-prep session: form intake, the sequential pipeline, and its report.

pub mod handlers;
pub mod pipeline;
pub mod report;
