mod parse;

pub use parse::linestrings_for_vector_tile;
