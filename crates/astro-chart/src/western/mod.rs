pub mod distribution;
pub mod placement;
pub mod signs;

pub use distribution::{element_distribution, modality_distribution, Distribution};
pub use placement::{house_of, in_arc, place, resolve_longitude, round2, Placement};
pub use signs::{degree_in_sign, normalize_degrees, sign_of, Element, Modality, Sign};
