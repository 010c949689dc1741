// Deterministic numeric core shared by recruiting and talent flows.
// No I/O, no logging, no shared state: every call is a pure function of its inputs.

pub mod aptitude;
pub mod normalize;
