use crate::cli::ImportArgs;
use crate::fs::{default_fs, FileSystem};
use crate::style;

use super::CommandContext;

pub fn cmd_import(args: ImportArgs) -> i32 {
    let ctx = match CommandContext::new(&args.path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let json = match default_fs().read_to_string(&args.file) {
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

    let filename = args
        .file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload.json")
        .to_string();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    rt.block_on(async {
        let parts = match super::open_service(&ctx, &args.user).await {
            Ok(parts) => parts,
            Err(msg) => {
                style::error(&msg);
                return 1;
            }
        };

        match parts.service.upload_graph(&filename, &json).await {
            Ok(meta) => {
                style::success(&format!("Recorded snapshot '{}'", meta.filename));
                println!("{}", style::metric("nodes", meta.node_count));
                println!("{}", style::metric("edges", meta.edge_count));
                0
            }
            Err(e) => {
                style::error(&e.to_string());
                style::hint("uploads need top-level \"nodes\" and \"edges\" arrays of {data: ...} entries");
                1
            }
        }
    })
}
