pub mod boot;
pub mod config;
pub mod controllers;
pub mod ease;
pub mod graph;
pub mod layout;
pub mod nav;
pub mod registry;
pub mod scene;
pub mod scroll;
pub mod sections;
pub mod session;
pub mod timeline;
pub mod trigger;

pub use boot::{BootSequence, BootState};
pub use config::{BootTimings, ConfigError, MotionConfig};
pub use graph::{GraphFocus, GraphInputError, generate_graph, parse_skills};
pub use layout::{LayoutProbe, StaticLayout};
pub use nav::{ActiveLinkStrategy, NavCoordinator, NavEvent, NavLink};
pub use registry::{RegistryEvent, SectionRegistry, SubscriptionId};
pub use scene::{SceneError, ScopeId, ScrollScene, SectionController};
pub use scroll::{ScrollDirection, ScrollFrame, ScrollSource, ScrollUpdate, SmoothScroll};
pub use sections::{MotionProfile, PageContent, SectionKind, page_controllers, page_layout};
pub use session::{FrameOutput, PageSession, SessionError};
pub use timeline::{PhaseSample, PhaseTable, PhaseWindow, TimelineError};
pub use trigger::{ScrubTrigger, TriggerEvent, TriggerRange};
