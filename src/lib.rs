pub mod core;
pub mod search;
pub mod query;
pub mod view;

pub use crate::core::config::{Config, SearchConfig};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::store::RecordStore;
pub use crate::core::types::{Field, Record, RecordId, Timestamp};
pub use crate::query::pipeline::{DerivedView, derive};
pub use crate::query::types::SortOrder;
pub use crate::search::index::SearchIndex;
pub use crate::view::controller::ViewController;
pub use crate::view::shared::{SharedView, ViewSnapshot};
pub use crate::view::state::{Layout, ViewState};

/*
┌──────────────────────────────── RECORDVIEW ARCHITECTURE ────────────────────────────────┐

  RecordStore (core::store)          immutable records, loaded once from JSON
        │
        ▼
  SearchIndex (search::index)        normalized names + Levenshtein DFAs + LRU of hits
        │
        ▼
  derive (query::pipeline)
  ┌────────────┐  ┌──────────────┐  ┌──────────┐  ┌───────────┐  ┌─────────────┐
  │ search     │─▶│ price, date  │─▶│ stable   │─▶│ group     │─▶│ paginate    │
  │ rank/score │  │ filters      │  │ sort     │  │ (opt.)    │  │ clamp index │
  └────────────┘  └──────────────┘  └──────────┘  └───────────┘  └─────────────┘
        ▲                                                              │
        │                                                              ▼
  ViewController (view::controller)  owns ViewState, re-derives per mutation,
                                     writes the clamped page index back
        │
        ▼
  SharedView (view::shared)          Arc<RwLock<ViewController>>, owned snapshots

└──────────────────────────────────────────────────────────────────────────────────────────┘
*/
