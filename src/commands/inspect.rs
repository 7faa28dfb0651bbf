use crate::cli::{InspectArgs, OutputFormat};
use crate::fs::{default_fs, FileSystem};
use crate::model::parse_upload;
use crate::normalize::normalize;
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;
use std::io::{self, Write};

pub fn cmd_inspect(args: InspectArgs) -> i32 {
    let fs = default_fs();

    let json = match fs.read_to_string(&args.file) {
        Ok(json) => json,
        Err(e) => {
            style::error(&format!(
                "Could not read {}: {}",
                style::path(&args.file),
                e
            ));
            return 1;
        }
    };

    let raw = match parse_upload(&json) {
        Ok(raw) => raw,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let elements = normalize(&raw);

    // Format to a buffer first, then render or write plain.
    let mut buffer = Vec::new();
    let format_result = match args.format {
        OutputFormat::Markdown => MarkdownOutput::new().format(&elements, &mut buffer),
        OutputFormat::Json => JsonOutput::new().format(&elements, &mut buffer),
    };

    if let Err(e) = format_result {
        style::error(&format!("Failed to format output: {}", e));
        return 1;
    }

    let output_str = String::from_utf8_lossy(&buffer);

    let write_result = match &args.output {
        Some(output_path) => fs.write(output_path, &output_str),
        None if args.format == OutputFormat::Markdown => {
            style::render_markdown(&output_str, &mut io::stdout())
        }
        None => write!(io::stdout(), "{}", output_str),
    };

    if let Err(e) = write_result {
        style::error(&format!("Failed to write output: {}", e));
        return 1;
    }

    0
}
