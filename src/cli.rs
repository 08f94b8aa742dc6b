// File: ./src/cli.rs
//! Shared command-line logic: argument parsing, help text and logger setup.
use crate::config::DateFormat;
use crate::context::AppContext;
use anyhow::{Result, anyhow};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::OpenOptions;
use std::path::PathBuf;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayArgs {
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub year: Option<i32>,
    /// Dates (YYYY-MM-DD) whose import toggle is switched off.
    pub skip: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add {
        start: String,
        end: Option<String>,
        from: Option<String>,
        to: Option<String>,
        reason: String,
    },
    Delete(String),
    Clear,
    Countries,
    States(String),
    Regions(String, String),
    Holidays(HolidayArgs),
    Import(HolidayArgs),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn parse_holiday_args(rest: &[String], allow_skip: bool) -> Result<HolidayArgs> {
    let mut out = HolidayArgs::default();
    let mut positional = Vec::new();
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--state" => out.state = Some(take_value(rest, &mut i, "--state")?),
            "--city" => out.city = Some(take_value(rest, &mut i, "--city")?),
            "--year" => {
                let v = take_value(rest, &mut i, "--year")?;
                out.year = Some(v.parse().map_err(|_| anyhow!("Invalid year '{}'", v))?);
            }
            "--skip" if allow_skip => out.skip.push(take_value(rest, &mut i, "--skip")?),
            arg if arg.starts_with('-') => return Err(anyhow!("Unknown option '{}'", arg)),
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }
    out.country = positional
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Missing country code"))?;
    Ok(out)
}

fn parse_add(rest: &[String]) -> Result<Command> {
    let mut positional = Vec::new();
    let (mut from, mut to, mut reason) = (None, None, String::new());
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--from" => from = Some(take_value(rest, &mut i, "--from")?),
            "--to" => to = Some(take_value(rest, &mut i, "--to")?),
            "--reason" => reason = take_value(rest, &mut i, "--reason")?,
            arg if arg.starts_with("--") => return Err(anyhow!("Unknown option '{}'", arg)),
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }
    let mut positional = positional.into_iter();
    let start = positional
        .next()
        .ok_or_else(|| anyhow!("Missing start date"))?;
    Ok(Command::Add {
        start,
        end: positional.next(),
        from,
        to,
        reason,
    })
}

/// Parses `args` without the binary name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut verbose = false;
    let mut i = 0;

    // Global flags come before the command.
    while i < args.len() {
        match args[i].as_str() {
            "--root" | "-r" => root = Some(PathBuf::from(take_value(args, &mut i, "--root")?)),
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" | "help" => {
                return Ok(CliArgs {
                    root,
                    verbose,
                    command: Command::Help,
                });
            }
            _ => break,
        }
        i += 1;
    }

    let Some(name) = args.get(i) else {
        return Ok(CliArgs {
            root,
            verbose,
            command: Command::List,
        });
    };
    let rest = &args[i + 1..];
    let arg = |n: usize, what: &str| {
        rest.get(n)
            .cloned()
            .ok_or_else(|| anyhow!("Missing {}", what))
    };

    let command = match name.as_str() {
        "list" => Command::List,
        "add" => parse_add(rest)?,
        "delete" => Command::Delete(arg(0, "waiver key")?),
        "clear" => Command::Clear,
        "countries" => Command::Countries,
        "states" => Command::States(arg(0, "country code")?),
        "regions" => Command::Regions(arg(0, "country code")?, arg(1, "state code")?),
        "holidays" => Command::Holidays(parse_holiday_args(rest, false)?),
        "import" => Command::Import(parse_holiday_args(rest, true)?),
        other => return Err(anyhow!("Unknown command '{}'. See --help.", other)),
    };

    Ok(CliArgs {
        root,
        verbose,
        command,
    })
}

/// Logs to `waiver.log` in the data directory.
pub fn init_logging(ctx: &dyn AppContext, verbose: bool) -> Result<()> {
    let Some(path) = ctx.get_log_path() else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(level, config, file)?;
    Ok(())
}

pub fn print_help(binary_name: &str) {
    println!(
        "Workday Waiver v{} - mark vacation, holidays and leave as waived workdays",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--verbose] <command>", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    list                                  Show stored waivers (default)");
    println!("    add <start> [<end>] [--from HH:MM] [--to HH:MM] [--reason TEXT]");
    println!("                                          Waive a day or a date range");
    println!("    delete <key>                          Remove a waiver by key");
    println!("    clear                                 Remove every waiver");
    println!("    countries                             List countries with holiday data");
    println!("    states <country>                      List states of a country");
    println!("    regions <country> <state>             List regions of a state");
    println!("    holidays <country> [--state S] [--city C] [--year Y]");
    println!("                                          Preview public holidays");
    println!("    import <country> [--state S] [--city C] [--year Y] [--skip YYYY-MM-DD]...");
    println!("                                          Import public holidays as waivers");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Debug-level logging.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("Dates are YYYY-MM-DD. Waiver keys are the start date, or <start>_<end>.");
    println!("Holiday data is read from holidays.json in the data directory.");
    println!();
    println!("PREFERENCES (preferences.toml in the config directory):");
    let formats: Vec<String> = DateFormat::iter()
        .map(|f| format!("{:?} ({})", f, f))
        .collect();
    println!("    date_format           {}", formats.join(", "));
    println!("    working_days          monday..sunday = true/false");
    println!("    hours_per_day         Default waived hours, HH:MM");
    println!("    country/state/city    Default holiday selection");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_default_command_is_list() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed.command, Command::List);
        assert_eq!(parsed.root, None);
    }

    #[test]
    fn test_global_flags_then_add() {
        let parsed =
            parse_args(&args("--root /tmp/x -v add 2020-07-16 2020-07-17 --from 09:00 --reason trip"))
                .unwrap();
        assert_eq!(parsed.root, Some(PathBuf::from("/tmp/x")));
        assert!(parsed.verbose);
        assert_eq!(
            parsed.command,
            Command::Add {
                start: "2020-07-16".into(),
                end: Some("2020-07-17".into()),
                from: Some("09:00".into()),
                to: None,
                reason: "trip".into(),
            }
        );
    }

    #[test]
    fn test_import_with_skips() {
        let parsed = parse_args(&args(
            "import US --state CA --year 2020 --skip 2020-01-01 --skip 2020-07-04",
        ))
        .unwrap();
        match parsed.command {
            Command::Import(h) => {
                assert_eq!(h.country, "US");
                assert_eq!(h.state.as_deref(), Some("CA"));
                assert_eq!(h.year, Some(2020));
                assert_eq!(h.skip.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(&args("frobnicate")).is_err());
        assert!(parse_args(&args("holidays")).is_err());
        assert!(parse_args(&args("holidays US --skip 2020-01-01")).is_err());
        assert!(parse_args(&args("holidays US --year twenty")).is_err());
        assert!(parse_args(&args("regions US")).is_err());
    }
}
