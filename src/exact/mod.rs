//! Exact diploid allele-frequency model.
//!
//! The conformation space (all allele-count vectors with total at most `2N`)
//! is explored with an explicit worklist instead of recursion: a conformation
//! is created when a predecessor first references it, accumulates pushes
//! while queued, is processed once, and is then evicted.

mod bound;
mod brute_force;
mod cache;
mod conformation;
mod counts;
mod reference;
mod successors;
mod tracker;

pub use brute_force::BruteForceDiploid;
pub use cache::FrontierProfile;
pub use counts::AlleleCounts;
pub use reference::ReferenceDiploidExact;
pub use tracker::StateTracker;
