pub mod config;
pub mod feature;
pub mod host;
pub mod layout;
pub mod layout_dump;
pub mod registry;
#[cfg(feature = "font-metrics")]
pub mod text_metrics;

pub use config::{ConfigError, EngineConfig, load_config};
pub use feature::{
    Feature, FeatureGeometry, GeoPoint, GeometryKind, IconSpec, LabelOptions, LabelPos, LabelStyle,
    PosPolicy, Prop,
};
pub use host::{MapHost, ViewTransform};
pub use layout::{Bounds, LabelEngine, LineAnchors, LinePoint, PassStats, PlacedInstance, line_anchors};
pub use layout_dump::{PlacementDump, write_placement_dump};
pub use registry::{Label, LabelRegistry};
