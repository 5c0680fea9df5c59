mod all_cmd;
mod cli;
mod shared;
mod tables_cmd;
mod text_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::ExtractText {
            ref input,
            ref output,
            text_method,
            report,
        } => text_cmd::run(input, output.as_deref(), text_method.into(), report.json),
        cli::Commands::ExtractTables {
            ref input,
            ref output_dir,
            table_method,
            format,
            report,
        } => tables_cmd::run(
            input,
            output_dir.as_deref(),
            table_method.into(),
            format.into(),
            report.json,
        ),
        cli::Commands::ExtractAll {
            ref input,
            ref output_dir,
            text_method,
            table_method,
            format,
            report,
        } => all_cmd::run(
            input,
            output_dir.as_deref(),
            text_method.into(),
            table_method.into(),
            format.into(),
            report.json,
        ),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
