mod cfg;

pub use cfg::{Cfg, CfgEdge, CfgEdgeKind};
