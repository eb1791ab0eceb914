//! Local/remote reconciliation.
//!
//! Everything here works on in-memory snapshots built fresh per command:
//!
//! - **Snapshot**: live remote state, with the two-phase dashboard fetch
//! - **Diff**: structural delta between local files and remote state
//! - **Merge**: upsert one object into an existing collection by id
//! - **Push**: strip rejected fields and send local objects as updates
//!
//! # Example
//!
//! ```ignore
//! use doghouse::reconcile::{diff, fetch_remote_snapshot};
//!
//! let remote = fetch_remote_snapshot(&client, &mut |_| {})?;
//! let local = doghouse::store::read_all(&folder)?;
//! if diff(&local, &remote).is_empty() {
//!     println!("No difference - nothing to do!");
//! }
//! ```

mod diff;
mod merge;
mod push;
mod snapshot;

pub use diff::{diff, diff_collection, print_diff, Change, DiffResult, KindDelta};
pub use merge::{contains_id, merge_object, MergeOutcome, OnConflict};
pub use push::{prepare_push, push_collection, PreparedUpdate, PushStats};
pub use snapshot::{fetch_kind, fetch_remote_snapshot, Progress, RemoteSnapshot};
