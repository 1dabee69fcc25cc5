//! The link canvas: PM-centred layout plus an interactive canvas host.

mod component;
pub mod edge;
pub mod layout;
mod render;
pub mod state;
pub mod status;
pub mod types;

pub use component::LinkCanvas;
pub use edge::{EdgeCurve, EdgeHover, LabelBadge, Point};
pub use layout::{LayoutConfig, StatusBuckets, build_status_buckets, compute_layout, compute_layout_with, department_color};
pub use status::LinkStatus;
pub use types::{CanvasData, Layout, LayoutEdge, LayoutNode, Link, LinkParticipant, LinkRole, NodeKind, Participant};
