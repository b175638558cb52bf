// Resume intake: file decoding and per-user persistence of the experience section.

pub mod parser;
pub mod store;
