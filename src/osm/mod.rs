pub mod parser;

pub use parser::way_from_element;
