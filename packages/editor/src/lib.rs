//! # Blockcanvas Editor
//!
//! Reordering core for the block page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ drag layer: onDragStart / onDrag / onDragEnd│
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Canvas session                      │
//! │  - Reorder engine (existing blocks)         │
//! │  - Insertion protocol (palette → list)      │
//! │  - Ordered item list snapshots              │
//! │  - Default style/metadata seeding           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: draws the list, measures geometry │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **List is source of truth**: render order is the list order
//! 2. **Snapshots, not aliasing**: every change yields a new list
//! 3. **One swap per tick**: long moves happen over successive events
//! 4. **Absorb anomalies**: stale geometry or a lost cursor skips a tick
//!
//! ## Usage
//!
//! ```rust
//! use blockcanvas_editor::{
//!     BlockSubtype, Canvas, DragSource, EditorConfig, Geometry, GestureEvent, PointerPosition,
//! };
//!
//! let mut canvas = Canvas::new(EditorConfig::default());
//! let a = canvas.append_block(BlockSubtype::Text);
//! canvas.measure(a, Geometry::new(10.0, 100.0));
//! canvas.set_viewport_width(1200.0);
//!
//! canvas.handle(GestureEvent::DragStart {
//!     source: DragSource::Palette { subtype: BlockSubtype::Input },
//! });
//! canvas.handle(GestureEvent::Drag { pointer: PointerPosition::new(300.0, 5.0) });
//! let update = canvas.handle(GestureEvent::DragEnd);
//!
//! let dropped = update.dropped.expect("dropped above the text block");
//! assert_eq!(canvas.items().block_ids(), vec![dropped.id, a]);
//! ```

mod config;
mod defaults;
mod errors;
mod geometry;
mod ids;
mod insertion;
mod item;
mod list;
mod mutations;
mod reorder;
mod session;
mod store;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use defaults::{BlockDefaults, DefaultsTable};
pub use errors::EditorError;
pub use geometry::{Geometry, GeometryProvider, GeometrySnapshot, PointerPosition};
pub use ids::{IdAllocator, IdPolicy};
pub use insertion::{DropOutcome, DroppedBlock, InsertionProtocol, InsertionState};
pub use item::{BlockSubtype, Item, ItemId, ItemKind};
pub use list::ItemList;
pub use mutations::{ListError, ListMutation};
pub use reorder::{decide, Direction, ReorderEngine, SwapDecision, SwapThreshold};
pub use session::{Canvas, CanvasUpdate, DragSource, GestureEvent};
pub use store::{BlockStore, MemoryStore, Metadata, StylePatch};
