mod fact;
mod result;
mod value;

pub use fact::{CPFact, SetFact};
pub use result::DataflowResult;
pub use value::Value;
