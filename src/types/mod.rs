// Value types carried by attribute payloads

pub mod bearer;
pub mod contentid;
pub mod genre;
pub mod timepoint;
pub mod value;

pub use bearer::Bearer;
pub use contentid::{ContentId, EnsembleId, ServiceId};
pub use genre::{Genre, GenreScheme};
pub use timepoint::Timepoint;
pub use value::Value;
