//! Mention lookup core
//!
//! Query lifecycle, remote lookup, suggestion mapping and selection.

pub mod controller;
pub mod lookup;
pub mod selection;
pub mod session;
pub mod suggestion;
pub mod view;
pub mod worker;

pub use controller::{DEFAULT_LIMIT, QueryController, QueryPhase};
pub use lookup::{LookupClient, LookupError, LookupRequest, NextcloudClient};
pub use selection::{MentionReference, MentionSource, to_mention_reference};
pub use session::{Account, RoomToken, SessionContext};
pub use suggestion::{RawCandidate, SuggestionItem, map_candidates};
pub use view::{MentionSink, SuggestionListView};
pub use worker::{LookupCommand, LookupResponse, RetryPolicy, spawn_worker};
