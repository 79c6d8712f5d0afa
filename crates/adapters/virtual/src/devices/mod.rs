mod light;

pub use light::{FixtureState, VirtualLight};
