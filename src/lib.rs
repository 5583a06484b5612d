//! # sebayt
//!
//! Knowledge tracking and graph-layout engine for learning dashboards:
//! search-result clicks become a persistent, classified knowledge base with
//! per-topic learning paths, advisory insights, and an interactive
//! force-directed layout.
//!
//! ## Architecture
//!
//! - **Classification** (`classify`): stateless, total heuristics for
//!   difficulty, category, related topics, prerequisites, next steps
//! - **Knowledge store** (`store`): canonical node collection, dense array +
//!   id index, click tracking and time accounting
//! - **Paths & insights** (`path`, `insight`): per-topic aggregation and a
//!   capped advisory buffer
//! - **Layout** (`layout`): derived connection set + force simulation +
//!   pointer interaction
//! - **Persistence** (`persist`): three independent JSON blobs in redb
//! - **Facade** (`engine`): wires the flow and owns everything
//!
//! ## Library usage
//!
//! ```
//! use sebayt::engine::{EngineConfig, SebaytEngine};
//! use sebayt::search::SearchResult;
//!
//! let mut engine = SebaytEngine::open(EngineConfig::default()).unwrap();
//! let result = SearchResult::new(
//!     "Intro to Rust",
//!     "https://example.com/intro",
//!     "example.com",
//!     "getting started with ownership",
//! );
//! let node = engine.track_click(&result, "rust").unwrap();
//! assert_eq!(node.time_spent, 30);
//! engine.tick();
//! let snapshot = engine.layout_snapshot();
//! assert_eq!(snapshot.positions.len(), 1);
//! ```

pub mod bus;
pub mod classify;
pub mod engine;
pub mod error;
pub mod insight;
pub mod layout;
pub mod node;
pub mod path;
pub mod persist;
pub mod search;
pub mod store;
