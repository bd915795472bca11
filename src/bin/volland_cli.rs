//! Volland CLI: 通过批处理客户端发起单次查询并以 JSON 输出结果
//!
//! Usage:
//!   volland-cli exposure <ticker> <greek> <kind> [--exp <yyyy-mm-dd>]...
//!   volland-cli trend <ticker> <greek>
//!   volland-cli paradigm <ticker>
//!   volland-cli zerodte <ticker>
//!   volland-cli tickers [prefix]

use chrono::NaiveDate;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use volland_rs::{tickers, Greek, OptionKind, VollandClient};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = match args[1].as_str() {
        "exposure" | "trend" | "paradigm" | "zerodte" => run_query(&args[1], &args[2..]),
        "tickers" => cmd_tickers(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("volland-cli {}", env!("CARGO_PKG_VERSION"));
            0
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            1
        }
    };
    std::process::exit(code);
}

fn print_usage() {
    println!(
        r#"volland-cli: Volland API 命令行工具

USAGE:
    volland-cli <COMMAND> [ARGS] [--tokens <n>]

COMMANDS:
    exposure <ticker> <greek> <kind> [--exp <date>]...
                                Exposure by strike (all expirations unless --exp is given)
    trend <ticker> <greek>      Historical greek trend
    paradigm <ticker>           Current paradigm, target and LIS
    zerodte <ticker>            Same-day-expiry aggregates
    tickers [prefix]            List supported tickers
    version                     Show version information
    help                        Show this help message

    greek: delta | gamma | vanna | charm | vega | theta
    kind:  call | put | both

ENVIRONMENT:
    VOLLAND_API_KEY             API key (if not stored in the OS keyring)
    VOLLAND_BASE_URL            Service endpoint override
    RUST_LOG                    Log filter (default: warn)"#
    );
}

fn cmd_tickers(args: &[String]) -> i32 {
    let prefix = args.first().map(|p| p.to_uppercase()).unwrap_or_default();
    for ticker in tickers::SUPPORTED_TICKERS
        .iter()
        .filter(|t| t.starts_with(&prefix))
    {
        println!("{ticker}");
    }
    0
}

/// Split `--tokens` and `--exp` flags from positional arguments.
struct QueryArgs {
    positional: Vec<String>,
    expirations: Vec<NaiveDate>,
    tokens: i64,
}

fn parse_query_args(args: &[String]) -> Result<QueryArgs, String> {
    let mut parsed = QueryArgs {
        positional: Vec::new(),
        expirations: Vec::new(),
        tokens: 1,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--exp" => {
                let raw = iter.next().ok_or("--exp needs a date")?;
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date {raw:?}, expected yyyy-mm-dd"))?;
                parsed.expirations.push(date);
            }
            "--tokens" => {
                let raw = iter.next().ok_or("--tokens needs a number")?;
                parsed.tokens = raw
                    .parse()
                    .map_err(|_| format!("invalid token count {raw:?}"))?;
            }
            _ => parsed.positional.push(arg.clone()),
        }
    }
    Ok(parsed)
}

fn arg<'a>(args: &'a QueryArgs, i: usize, name: &str) -> Result<&'a str, String> {
    args.positional
        .get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("missing <{name}>"))
}

fn parse_arg<T>(args: &QueryArgs, i: usize, name: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    arg(args, i, name)?
        .to_lowercase()
        .parse()
        .map_err(|e: T::Err| e.to_string())
}

fn run_query(command: &str, args: &[String]) -> i32 {
    let parsed = match parse_query_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            return 2;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            return 1;
        }
    };

    match runtime.block_on(query(command, &parsed)) {
        Ok(Some(json)) => {
            println!("{json}");
            0
        }
        Ok(None) => {
            eprintln!("no result received before the timeout");
            3
        }
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

fn to_json<T: Serialize>(value: Option<T>) -> Result<Option<String>, String> {
    value
        .map(|v| serde_json::to_string_pretty(&v).map_err(|e| e.to_string()))
        .transpose()
}

async fn query(command: &str, args: &QueryArgs) -> Result<Option<String>, String> {
    let ticker = arg(args, 0, "ticker")?;
    let client = VollandClient::new(args.tokens)
        .await
        .map_err(|e| e.to_string())?;

    let json = match command {
        "exposure" => {
            let greek: Greek = parse_arg(args, 1, "greek")?;
            let kind: OptionKind = parse_arg(args, 2, "kind")?;
            let expirations = Some(args.expirations.clone());
            to_json(
                client
                    .request_exposure(ticker, kind, greek, expirations)
                    .await
                    .map_err(|e| e.to_string())?,
            )
        }
        "trend" => {
            let greek: Greek = parse_arg(args, 1, "greek")?;
            to_json(
                client
                    .request_trend(ticker, greek)
                    .await
                    .map_err(|e| e.to_string())?,
            )
        }
        "paradigm" => to_json(
            client
                .request_paradigm(ticker)
                .await
                .map_err(|e| e.to_string())?,
        ),
        _ => to_json(
            client
                .request_zero_dte(ticker)
                .await
                .map_err(|e| e.to_string())?,
        ),
    };
    client.shutdown();
    json
}
