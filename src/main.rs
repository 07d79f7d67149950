#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use json_searcher::query_cmd::{self, Operation, QueryConfig};
use json_searcher::storage::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "json-searcher")]
#[command(about = "Search a JSON file for objects with specific attributes", long_about = None)]
struct Cli {
    /// Path to input JSON file
    #[arg(long = "input_file")]
    input_file: PathBuf,
    /// Path to output file
    #[arg(long = "output_file")]
    output_file: PathBuf,
    /// Search query in the format 'key=value'
    #[arg(long, num_args = 0.., value_name = "KEY=VALUE")]
    search: Option<Vec<String>>,
    /// Object to insert in the format 'key=value'
    #[arg(long, num_args = 0.., value_name = "KEY=VALUE")]
    insert: Option<Vec<String>>,
    /// Index of object to edit, followed by the fields to set as 'key=value'
    #[arg(long, num_args = 1.., allow_negative_numbers = true, value_names = ["INDEX", "KEY=VALUE"])]
    edit: Option<Vec<String>>,
    /// Index of object to delete
    #[arg(long, allow_negative_numbers = true)]
    delete: Option<i64>,
    /// Export format (csv or json)
    #[arg(long = "export_format", value_enum, default_value_t = ExportFormat::Csv)]
    export_format: ExportFormat,
    /// Enable verbose logging (or set JSON_SEARCHER_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("JSON_SEARCHER_LOG").unwrap_or_else(|_| {
        if verbose { "json_searcher=debug".to_string() } else { "json_searcher=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Operation::select(cli.search, cli.insert, cli.edit, cli.delete).and_then(|operation| {
        query_cmd::run(QueryConfig {
            input_file: cli.input_file,
            output_file: cli.output_file,
            operation,
            export_format: cli.export_format,
        })
    });

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_searcher::core::parse_fields;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["json-searcher", "--input_file", "in.json", "--output_file", "out.csv"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("failed to parse args")
    }

    fn operation(cli: Cli) -> Operation {
        Operation::select(cli.search, cli.insert, cli.edit, cli.delete).expect("failed to select")
    }

    #[test]
    fn test_edit_takes_index_and_fields() {
        let cli = parse(&["--edit", "1", "age=42", "city=Lima"]);
        assert_eq!(
            operation(cli),
            Operation::Edit { index: 1, fields: parse_fields(&["age=42", "city=Lima"]).unwrap() }
        );
    }

    #[test]
    fn test_negative_indices_reach_the_store() {
        let cli = parse(&["--edit", "-1", "age=42"]);
        assert!(matches!(operation(cli), Operation::Edit { index: -1, .. }));

        let cli = parse(&["--delete", "-2"]);
        assert_eq!(operation(cli), Operation::Delete { index: -2 });
    }

    #[test]
    fn test_token_lists_stop_at_next_flag() {
        let cli = parse(&["--search", "name=Hiram", "age=30", "--export_format", "json"]);
        assert_eq!(cli.export_format, ExportFormat::Json);
        assert_eq!(operation(cli), Operation::Search(parse_fields(&["name=Hiram", "age=30"]).unwrap()));
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.export_format, ExportFormat::Csv);
        assert!(!cli.verbose);
        assert_eq!(operation(cli), Operation::ListAll);
    }

    #[test]
    fn test_rejects_unknown_format_and_missing_paths() {
        assert!(Cli::try_parse_from(["json-searcher", "--input_file", "in.json"]).is_err());
        let argv = ["json-searcher", "--input_file", "a", "--output_file", "b", "--export_format", "xml"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
