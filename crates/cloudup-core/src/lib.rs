//! Upload pipeline for cloudup.
//!
//! Takes media pasted, dropped or embedded in notes, uploads it through an
//! [`Uploader`] and rewrites the note markup to point at the remote copy.
//!
//! # Architecture
//!
//! The crate never touches the host application directly. The host provides:
//! - [`Editor`] for the live text of the active note
//! - [`Vault`] for listing, reading and writing vault files
//! - [`Notifier`] for notices and the transient status indicator
//! - [`Confirm`] for the prompt before bulk operations
//!
//! [`TextBuffer`] is a ready-made [`Editor`] over an owned string.
//!
//! On top of those:
//! - [`Pipeline`] runs single-file tasks (paste/drop, embed, backup)
//! - [`Orchestrator`] runs batches of tasks sequentially with consolidated reporting
//! - [`confirm_batch`] gates batches behind confirmation
//!
//! In-memory host implementations for tests live behind the `mock` feature.
//!
//! # Example
//!
//! ```ignore
//! use cloudup_core::{BatchMode, Orchestrator, Pipeline};
//!
//! let pipeline = Pipeline::new(&config, &client, &notifier);
//! let outcome = Orchestrator::new(&pipeline, &vault).run(&BatchMode::AllNotes)?;
//! ```

mod batch;
mod buffer;
mod destination;
mod embed;
mod error;
mod format;
mod gate;
mod host;
mod markup;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod placeholder;
mod task;
mod transform;
mod uploader;

pub use batch::{BatchItem, BatchMode, BatchOutcome, BatchPlan, BatchSummary, Orchestrator};
pub use buffer::TextBuffer;
pub use destination::{Destination, resolve, resolve_backup};
pub use embed::{Embed, find_embeds};
pub use error::{UploadError, VaultError};
pub use format::{MediaKind, MediaSource, classify, classify_extension, classify_mime};
pub use gate::{confirm_batch, prompt};
pub use host::{Confirm, Editor, Notice, NoticeLevel, Notifier, Vault, VaultFile};
pub use markup::{local_link, markup};
pub use placeholder::{Placeholder, Placeholders};
pub use task::{EventDisposition, PastedFile, Pipeline, TaskState, Trigger};
pub use transform::{params_for, transform_for, transform_url};
pub use uploader::{RemoteAsset, UploadRequest, Uploader};
