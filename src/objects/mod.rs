pub mod convex_body;
pub mod feature;

pub use convex_body::ConvexBody;
pub use feature::BodyFeature;
