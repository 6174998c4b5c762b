pub mod dimension;
pub mod record;
pub mod rules;
pub mod sampler;
pub mod scorer;
pub mod traits;
pub mod vector;

pub use dimension::*;
pub use record::*;
pub use rules::{Rule, RuleContext, RuleOptions};
pub use sampler::*;
pub use scorer::*;
pub use traits::*;
pub use vector::*;
