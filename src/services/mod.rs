pub mod catalog;
pub mod form_fields;
pub mod genres;
pub mod providers;
pub mod seed;
pub mod title_search;

pub use genres::GenreResolver;
pub use providers::{MetadataProvider, TmdbProvider};
