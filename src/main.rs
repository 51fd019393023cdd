use clap::Parser;
use miette::Result;
use stockroom::cli::{commands, Cli, Commands};

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

    let cli = Cli::parse();
    let acting_as = cli.acting_as.as_deref();

    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Item(cmd) => commands::item::run(cmd, acting_as),
        Commands::User(cmd) => commands::user::run(cmd),
        Commands::Course(cmd) => commands::course::run(cmd),
        Commands::Group(cmd) => commands::group::run(cmd),
        Commands::Order(cmd) => commands::order::run(cmd),
        Commands::Status(cmd) => commands::status::run(cmd, acting_as),
        Commands::Sweep(args) => commands::sweep::run(args, acting_as),
        Commands::Letter(args) => commands::letter::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
