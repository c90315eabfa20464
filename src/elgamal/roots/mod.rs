pub mod roots;

pub use roots::{is_primitive_root, multiplicative_order, primitive_roots, root_hint};
