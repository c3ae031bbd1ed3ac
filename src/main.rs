use intentive::{
    CapabilityError, Entity, FuzzyEntityTransform, FuzzyItemDefinition, FuzzyMatchResult,
    FuzzyTextMatcher, IntentGate, IntentPattern, IntentResolver, PatternRecognizer,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, BufRead, IsTerminal};

static ORDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:let me get|i would like|may i please have|i'd like)\s+(?:(?P<quantity>\d+)\s+)?(?P<item>.+)",
    )
    .unwrap()
});
static CANCEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:cancel|nevermind|forget it)\b").unwrap());
static COMPLETE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:that's all|i'm done|that's it)").unwrap());

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let resolver = menu_resolver();

    let run = match config.input {
        Some(utterance) => resolve_and_print(&resolver, &utterance, config.pretty).await,
        None => run_repl(&resolver, config.pretty).await,
    };

    if let Err(err) = run {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    input: Option<String>,
    pretty: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut pretty = false;
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("intentive {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--pretty" => pretty = true,
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    Ok(CliConfig { input, pretty })
}

async fn run_repl(resolver: &IntentResolver<(), Entity>, pretty: bool) -> Result<(), CapabilityError> {
    let stdin = io::stdin();

    if stdin.is_terminal() {
        eprintln!("intentive demo; one utterance per line, ctrl-d to exit");
    }

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: failed to read stdin: {err}");
                std::process::exit(1);
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        resolve_and_print(resolver, &line, pretty).await?;
    }

    Ok(())
}

async fn resolve_and_print(
    resolver: &IntentResolver<(), Entity>,
    utterance: &str,
    pretty: bool,
) -> Result<(), CapabilityError> {
    match resolver.process_utterance(&(), utterance).await? {
        None => println!("no intent recognized"),
        Some(result) => {
            let json = if pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            }
            .expect("recognized intents serialize");
            println!("{json}");
        }
    }

    Ok(())
}

/// Menu item resolved from free text by the fuzzy matcher.
#[derive(Debug, Clone, PartialEq)]
struct MenuItem {
    id: u32,
    name: &'static str,
}

/// A small menu-ordering resolver: a regex recognizer in front of a fuzzy
/// item lookup that is gated to the ordering intent.
fn menu_resolver() -> IntentResolver<(), Entity> {
    let recognizer = PatternRecognizer::new(vec![
        IntentPattern::new(ORDER_RE.clone(), "order-item"),
        IntentPattern::new(CANCEL_RE.clone(), "cancel-order"),
        IntentPattern::new(COMPLETE_RE.clone(), "complete-order"),
    ]);

    let menu = FuzzyTextMatcher::with_threshold(
        vec![
            FuzzyItemDefinition::new("hamburger", MenuItem { id: 101, name: "Hamburger" }),
            FuzzyItemDefinition::new("cheese burger", MenuItem { id: 102, name: "Cheeseburger" }),
            FuzzyItemDefinition::new("cheeseburger", MenuItem { id: 102, name: "Cheeseburger" }),
            FuzzyItemDefinition::new("garden salad", MenuItem { id: 201, name: "Garden Salad" }),
            FuzzyItemDefinition::new("french fries", MenuItem { id: 301, name: "French Fries" }),
            FuzzyItemDefinition::new("fries", MenuItem { id: 301, name: "French Fries" }),
        ],
        0.3,
    );

    let item_lookup = FuzzyEntityTransform::new(
        menu,
        Box::new(|entity: &Entity| {
            if entity.name() != "item" {
                return None;
            }
            entity.as_str().map(str::to_string)
        }),
        Box::new(|entity: Entity, matches: Vec<FuzzyMatchResult<MenuItem>>| match matches.first() {
            None => entity,
            Some(best) => Entity::Composite {
                name: "item".to_string(),
                children: vec![
                    entity,
                    Entity::Number {
                        name: "menu-item-id".to_string(),
                        value: f64::from(best.payload.id),
                        utterance_offsets: None,
                    },
                    Entity::String {
                        name: "menu-item-name".to_string(),
                        value: best.payload.name.to_string(),
                        utterance_offsets: None,
                    },
                ],
                utterance_offsets: None,
            },
        }),
    );

    IntentResolver::with_transform(
        recognizer,
        IntentGate::new(["order-item"], vec![Box::new(item_lookup) as _]),
    )
}

fn help_text() -> String {
    format!(
        "intentive {version}

Intent-resolution pipeline demo (menu ordering).

Usage:
  intentive [OPTIONS] [--] <utterance...>
  intentive [OPTIONS] --input <text>

With no input, reads utterances from stdin, one per line.

Options:
  -i, --input <text>   Utterance to resolve.
  --pretty             Pretty-print the JSON output.
  -h, --help           Show this help message.
  -V, --version        Print version information.

Exit codes:
  0  Success.
  1  A recognizer or transform capability failed.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
