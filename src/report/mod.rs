//! Report output: console summary, Markdown and JSON.

pub mod generator;

pub use generator::{
    generate_json_report, generate_markdown_report, print_summary, write_report,
};
