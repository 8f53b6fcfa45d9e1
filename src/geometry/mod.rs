pub mod densify;
pub mod simplify;
pub mod spherical;

pub use densify::densify;
pub use simplify::simplify_ring;
