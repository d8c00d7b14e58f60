use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::trace;

use crate::core::types::{Field, Record};
use crate::query::group::GroupKey;
use crate::query::paginate::PageInfo;
use crate::view::controller::ViewController;
use crate::view::state::ViewState;

/// Bucket header on a snapshot page.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpan {
    pub key: GroupKey,
    pub len: usize, // Members on this page
}

/// Owned copy of one page, detached from the lock
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub version: u64,
    pub timestamp: DateTime<Utc>,
    pub state: ViewState,
    pub info: PageInfo,
    pub rows: Vec<Record>,
    pub groups: Option<Vec<GroupSpan>>,
    pub visible_columns: Vec<Field>,
}

/// A view controller shared between threads.
///
/// Every mutation runs start to finish under the write lock, so readers never
/// observe a half-applied update. Concurrent writers are serialized and the
/// last one wins. Mutation only goes through `update`, so the version counts
/// every applied change.
#[derive(Clone)]
pub struct SharedView {
    controller: Arc<RwLock<ViewController>>,
    version: Arc<AtomicU64>,
}

impl SharedView {
    pub fn new(controller: ViewController) -> Self {
        SharedView {
            controller: Arc::new(RwLock::new(controller)),
            version: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Apply `mutation` atomically and bump the version.
    pub fn update<R>(&self, mutation: impl FnOnce(&mut ViewController) -> R) -> R {
        let mut controller = self.controller.write();
        let result = mutation(&mut controller);
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("View updated to version {}", version);
        result
    }

    pub fn read<R>(&self, reader: impl FnOnce(&ViewController) -> R) -> R {
        reader(&self.controller.read())
    }

    pub fn page_info(&self) -> PageInfo {
        self.controller.read().page_info()
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let controller = self.controller.read();
        let derived = controller.query();

        let groups = derived.rows.groups().map(|groups| {
            groups
                .iter()
                .map(|group| GroupSpan {
                    key: group.key.clone(),
                    len: group.rows.len(),
                })
                .collect()
        });

        ViewSnapshot {
            version: self.version(),
            timestamp: Utc::now(),
            state: controller.state().clone(),
            info: derived.info,
            rows: derived.page_rows().into_iter().cloned().collect(),
            groups,
            visible_columns: controller.visible_columns(),
        }
    }
}
