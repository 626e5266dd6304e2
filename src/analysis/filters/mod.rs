pub mod normalize;
pub mod stemmer;
pub mod stopword;
