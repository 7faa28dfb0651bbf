use crate::cli::ServeArgs;
use crate::server::{serve, AppState};
use crate::style;
use std::sync::Arc;

use super::CommandContext;

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let port = args.port.unwrap_or(ctx.config.server.port);

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    rt.block_on(async {
        let parts = match super::open_service(&ctx, &args.user).await {
            Ok(parts) => parts,
            Err(msg) => {
                style::error(&msg);
                return 1;
            }
        };

        let state = Arc::new(AppState {
            service: parts.service,
            fs: parts.fs,
            prefs_path: parts.prefs_path,
        });

        if let Err(e) = serve(state, port, args.open).await {
            style::error(&format!("Server failed: {}", e));
            return 1;
        }
        0
    })
}
