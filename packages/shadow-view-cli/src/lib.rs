//! Command-line front end for the Shadow View engine

pub mod commands;
pub mod logging;

pub use commands::{
    apply_file, apply_source, compile_files, compile_source, load_config, load_data, render_file,
    render_source, CompileReport,
};
pub use logging::init_logging;
