use clap::Parser;
use docuhub::cli::{Cli, Commands};
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => args.run(&cli.global),
        Commands::User(cmd) => cmd.run(&cli.global),
        Commands::Project(cmd) => cmd.run(&cli.global),
        Commands::Doc(cmd) => cmd.run(&cli.global),
        Commands::Submit(args) => args.run(&cli.global),
        Commands::Approve(args) => args.run(&cli.global),
        Commands::Reject(args) => args.run(&cli.global),
        Commands::Revise(args) => args.run(&cli.global),
        Commands::Review(args) => args.run(&cli.global),
        Commands::Version(args) => args.run(&cli.global),
        Commands::Rescind(args) => args.run(&cli.global),
        Commands::Restore(args) => args.run(&cli.global),
        Commands::History(args) => args.run(&cli.global),
        Commands::Stats(args) => args.run(&cli.global),
        Commands::Completions(args) => args.run(&cli.global),
    }
}
