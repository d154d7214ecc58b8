use clap::Parser;
use punctalyzer::{
    Cli, OutputFormatter, OutputMode, Punctalyzer, PunctalyzerError, UserFriendlyError,
};
use std::process;

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli);

    let exit_code = run(&cli);
    process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    // Handle special commands first
    if cli.list_categories {
        formatter_for(cli).print_categories();
        return 0;
    }

    if cli.generate_config {
        return handle_generate_config(cli);
    }

    let punctalyzer = match Punctalyzer::from_cli(cli) {
        Ok(punctalyzer) => punctalyzer,
        Err(e) => {
            formatter_for(cli).print_user_friendly_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return match punctalyzer.dry_run(&cli.inputs) {
            Ok(_) => 0,
            Err(e) => {
                punctalyzer.handle_error(&e);
                exit_code_for(&e)
            }
        };
    }

    match punctalyzer.analyze(&cli.inputs) {
        Ok(outcome) => {
            if outcome.report.has_failures() {
                2
            } else {
                0
            }
        }
        Err(e) => {
            punctalyzer.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &PunctalyzerError) -> i32 {
    match error {
        PunctalyzerError::Cancelled => 130, // Interrupted (SIGINT)
        PunctalyzerError::InvalidPath { .. } | PunctalyzerError::UnsupportedFormat { .. } => 3,
        PunctalyzerError::Config { .. } | PunctalyzerError::UnknownCategory { .. } => 4,
        PunctalyzerError::OutputExists { .. } => 5,
        PunctalyzerError::FontUnavailable { .. } => 6,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(punctalyzer::default_config_path);

    if config_path.exists() && !cli.force {
        let error = PunctalyzerError::OutputExists {
            path: config_path.display().to_string(),
        };
        formatter_for(cli).print_user_friendly_error(&error);
        return exit_code_for(&error);
    }

    match Punctalyzer::generate_sample_config(&config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!(
                "  punctalyzer <documents...> --config {}",
                config_path.display()
            );
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn formatter_for(cli: &Cli) -> OutputFormatter {
    let mode = match cli.output_format {
        punctalyzer::OutputFormat::Human => OutputMode::Human,
        punctalyzer::OutputFormat::Json => OutputMode::Json,
        punctalyzer::OutputFormat::Plain => OutputMode::Plain,
    };
    OutputFormatter::new(mode, cli.verbose, cli.quiet)
}

fn setup_logging(cli: &Cli) {
    let env = env_logger::Env::default().default_filter_or(cli.log_filter());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}
