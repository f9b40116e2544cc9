pub mod asset;
pub mod chunk_kind;
pub mod compilation_request;
pub mod compiler_output_file;
pub mod diagnostic;
pub mod module_declaration;
pub mod raw_idx;
pub mod renderer;
pub mod source_record;
