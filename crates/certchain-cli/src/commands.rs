use std::io;
use std::sync::Arc;

use anyhow::Context;
use certchain_registry::{IssueRequest, Registry};
use certchain_server::CertServer;
use colored::Colorize;
use tokio::runtime::Runtime;

use crate::cli::*;
use crate::console::Console;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Console(args) => cmd_console(args, cli.format),
        Command::Render(args) => cmd_render(args, cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.settings.resolve()?;
    let server = CertServer::new(config)?;
    println!(
        "{} certchain server on {} (difficulty {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.registry().difficulty()
    );
    let runtime = Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_console(args: ConsoleArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = args.settings.resolve()?;
    if let Some(Some(addr)) = args.serve {
        config.bind_addr = addr;
    }
    let registry = Arc::new(Registry::new(config.registry.clone())?);

    // Held until the console exits so the embedded server keeps running.
    let runtime = match args.serve {
        Some(_) => {
            let runtime = Runtime::new().context("failed to start async runtime")?;
            let addr = config.bind_addr;
            let server = CertServer::with_registry(config, Arc::clone(&registry));
            runtime.spawn(async move {
                if let Err(e) = server.serve().await {
                    tracing::error!(error = %e, "embedded server stopped");
                }
            });
            println!("{} verification server on http://{addr}", "✓".green().bold());
            Some(runtime)
        }
        None => None,
    };

    let stdin = io::stdin();
    Console::new(&registry, stdin.lock(), io::stdout(), format).run()?;

    if let Some(runtime) = runtime {
        runtime.shutdown_background();
    }
    Ok(())
}

fn cmd_render(args: RenderArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = args.settings.resolve()?;
    let registry = Registry::new(config.registry)?;
    let rendered = registry.render_only(IssueRequest {
        name: args.name,
        cert_id: args.cert_id,
        course: args.course,
        institution: args.institution,
        date: args.date,
        remarks: args.remarks,
        grade: args.grade,
    })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered)?),
        OutputFormat::Text => {
            println!("{} Certificate written to {}", "✓".green().bold(), rendered.path.display());
            println!("  Verify at: {}", rendered.verification_url.blue());
        }
    }
    Ok(())
}
