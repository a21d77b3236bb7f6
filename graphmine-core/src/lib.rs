//! Streaming frequent subgraph pattern mining over an evolving, edge-labeled
//! graph.
//!
//! A [`session::MiningSession`] consumes a stream of edge insertions (and,
//! in dynamic mode, removals) and maintains running counts of how often
//! each isomorphism class of connected k-node subgraph occurs, keyed by a
//! [`label::canonical_label`]. Three sampling strategies trade exactness
//! for memory:
//!
//! - **Exact** tracks every k-subgraph directly; correct but grows with the
//!   graph.
//! - **Naive reservoir** keeps a uniform sample of fixed size via classic
//!   reservoir sampling (Algorithm R), touching the RNG once per candidate.
//! - **Optimized reservoir** keeps the same sample using Vitter's skip-count
//!   algorithms ([`skip::SkipRs`]), touching the RNG once per *admitted*
//!   batch of candidates instead of once per candidate.
//!
//! Enumeration of which k-sets an edge event touches ([`enumerate`]) has a
//! closed-form case analysis for k=3 and k=4 and a general n-hop fallback
//! for any other k.
//!
//! ```
//! use graphmine_core::model::{Edge, Node};
//! use graphmine_core::session::{MiningSession, StreamKind};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut session = MiningSession::exact(3, StreamKind::Incremental, SmallRng::seed_from_u64(0));
//! session.add_edge(Edge::new(Node::new(1, 0), Node::new(2, 0), 0));
//! session.add_edge(Edge::new(Node::new(2, 0), Node::new(3, 0), 0));
//! session.add_edge(Edge::new(Node::new(1, 0), Node::new(3, 0), 0));
//! assert_eq!(session.patterns().map(|(_, c)| c).sum::<u64>(), 1);
//! ```

pub mod enumerate;
pub mod error;
pub mod graph;
pub mod label;
pub mod model;
pub mod reservoir;
pub mod session;
pub mod skip;

pub use error::MiningError;
pub use session::{MiningSession, StreamKind};
