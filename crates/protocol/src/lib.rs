pub mod graph;
pub mod keys;
pub mod status;
pub mod style;
pub mod theme;
pub mod types;

pub use graph::{CrossLink, GraphLink, GraphNode, NodeKind, SkillCategory, SkillGraph};
pub use keys::{ElementKey, NodeId, SectionId};
pub use status::{SectionSnapshot, SectionStatus};
pub use style::{StyleBatch, StyleChannels, StyleCommand};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};
