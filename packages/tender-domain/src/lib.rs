pub mod phrases;
pub mod score;
pub mod synonyms;
pub mod text;
