//! Column-to-target matching and review sessions.
//!
//! The matching pipeline:
//! 1. **Score**: bigram Dice similarity between a column and a leaf name
//! 2. **Rank**: an optional [`MatchRanker`] proposes matches for the batch,
//!    with local similarity as the fallback for any [`Degraded`] outcome
//! 3. **Refine**: columns below the refine threshold are matched again
//! 4. **Review**: a [`MappingSession`] takes reviewer edits, re-verifies and
//!    finalizes into reports

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod ranker;
pub mod score;
pub mod session;
pub mod store;
pub mod verify;

pub use config::{MatchThresholds, RankerConfig};
pub use engine::{Alternate, DEFAULT_ALTERNATES, MatchingEngine, alternates, local_match};
pub use error::{MapError, Result};
pub use ranker::{AzureChatRanker, Degraded, MatchRanker, RankRequest, RankedMatch};
pub use score::{dice_similarity, leaf_similarity};
pub use session::{
    DEFAULT_PROJECT_NAME, EditOutcome, MappingSession, PreviewMapping, PreviewPayload,
    SessionState,
};
pub use store::{DisposalPolicy, InMemorySessionStore, SessionStore, SharedSession};
pub use verify::{DUPLICATE_TARGET_ISSUE, verify, verify_with};
