// The binary document codec: TLV containers, the element tree, and the
// per-kind value encoders behind the attribute dispatch table

pub mod attribute;
pub mod container;
pub mod element;
pub mod tokens;
pub mod values;

pub use attribute::Kind;
pub use container::{read_container, write_container, Container, MAX_PAYLOAD};
pub use element::{decode, encode, Attribute, Element};
pub use tokens::TokenTable;
