//! View state machines for tickscope
//!
//! The chart viewport, the tabular view and layout persistence. Views own
//! their state behind a lock and expose pure render models; the widget
//! crate turns those into paint calls.

pub mod chart;
pub mod layout;
pub mod table;

pub use chart::{
    signal_color, BarShape, CandleShape, ChartConfig, ChartGeometry, ChartMode, ChartRenderModel,
    ChartView, Segment, SignalMarker, Tick,
};
pub use layout::{capture, restore, rewire, ElementRecord, LayoutDoc, RestoredLayout};
pub use table::{ColumnHeader, TableCell, TableModel, TableRow, TableView};
