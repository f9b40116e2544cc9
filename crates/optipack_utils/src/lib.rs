pub mod indexmap;
pub mod placeholder_name;
pub mod sanitize_source_path;
