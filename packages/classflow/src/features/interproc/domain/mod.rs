mod icfg;

pub use icfg::{Icfg, IcfgEdge, IcfgEdgeKind};
