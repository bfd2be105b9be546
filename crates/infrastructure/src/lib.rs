//! dnswalk infrastructure layer: wire codec, cache, UDP transport and the
//! iterative resolver engine.
pub mod dns;
