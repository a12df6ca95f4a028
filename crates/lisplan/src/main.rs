use clap::Parser;
use lisplan::{run, run_to_report, EvalConfig, RunOutput};
use lisplan_types::{LisplanError, SourceFile};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lisplan")]
#[command(version)]
#[command(about = "Evaluate a lisplan program and print what it produced")]
struct Args {
    /// Program to run. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// Print a JSON run report instead of the plain diagnostics.
    #[arg(long)]
    json: bool,

    /// Echo `print` output as it happens.
    #[arg(long)]
    echo: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let (name, source) = match read_source(args.file.as_ref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = EvalConfig {
        echo_print: args.echo,
    };

    if args.json {
        let report = run_to_report(&source, &name, &config);
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
        return if report.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match run(&source, &name, &config) {
        Ok(out) => {
            print_output(&out, args.echo);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e, &SourceFile::new(name, source));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, filtered by `LISPLAN_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LISPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn read_source(file: Option<&PathBuf>) -> std::io::Result<(String, String)> {
    match file {
        Some(path) => Ok((path.display().to_string(), std::fs::read_to_string(path)?)),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

fn print_output(out: &RunOutput, echoed: bool) {
    if !echoed {
        for line in &out.output {
            println!("{line}");
        }
    }
    println!("{}", render_list(&out.forms));
    println!("{}", render_list(&out.results));
    match out.first() {
        Some(first) => println!("{first}"),
        None => println!("()"),
    }
    let bindings: Vec<String> = out
        .bindings
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect();
    println!("{{{}}}", bindings.join(", "));
}

fn render_list(values: &[lisplan_types::Value]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("({})", items.join(" "))
}

fn print_error(error: &LisplanError, source: &SourceFile) {
    eprintln!("error[{}]: {error}", error.code());
    if let Some(span) = error.span() {
        eprintln!("  --> {}:{span}", source.name);
        if let Some(line) = source.line_of(span) {
            eprintln!("   |");
            eprintln!("   | {line}");
            eprintln!("   | {}^", " ".repeat(span.start_col.saturating_sub(1) as usize));
        }
    }
}
