mod builder;

pub use builder::CfgBuilder;
