pub mod pass_output;
