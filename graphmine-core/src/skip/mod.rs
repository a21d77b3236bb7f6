//! Skip-counting primitives behind the optimized reservoir algorithms
//! (spec §4.E): `rs` drives ordinary reservoir sampling, `rp` drives the
//! Random Pairing deletion-compensation step.

pub mod rp;
pub mod rs;

pub use rs::SkipRs;
