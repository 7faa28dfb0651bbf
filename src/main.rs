use clap::Parser;
use depviz::cli::{Cli, Command, ServeArgs};
use depviz::{cmd_import, cmd_init, cmd_inspect, cmd_serve};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depviz=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Some(Command::Serve(args)) => cmd_serve(args),
        Some(Command::Import(args)) => cmd_import(args),
        Some(Command::Inspect(args)) => cmd_inspect(args),
        Some(Command::Init(args)) => cmd_init(args),
        None => {
            // Bare invocation serves the viewer for the given path.
            let args = ServeArgs {
                path: cli.path,
                port: None,
                open: false,
                user: "admin".to_string(),
            };
            cmd_serve(args)
        }
    };

    std::process::exit(exit_code);
}
