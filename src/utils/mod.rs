pub mod redact;
pub mod suggest;
