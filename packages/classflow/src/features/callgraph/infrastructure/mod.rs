mod cha;

pub use cha::ChaBuilder;
