//! CLI argument parsing tests.

use chrono::{TimeZone, Utc};
use clap::Parser;
use workiz::cli::{parse_when, Cli, Command, Entity, Schedulable};

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["workiz", "get", "job", "XZDO9T"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, id } => {
            assert_eq!(entity, Entity::Job);
            assert_eq!(id, "XZDO9T");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_customer_alias() {
    let cli = Cli::parse_from(["workiz", "get", "client", "1002"]);

    match cli.command {
        Command::Get { entity, .. } => assert_eq!(entity, Entity::Customer),
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_team_subcommand() {
    let cli = Cli::parse_from(["workiz", "team"]);
    assert!(matches!(cli.command, Command::Team));
}

#[test]
fn test_list_filters() {
    let cli = Cli::parse_from([
        "workiz",
        "list",
        "jobs",
        "--start",
        "2023-02-01",
        "--end",
        "2023-03-01 12:30:00",
        "--status",
        "Submitted",
        "--status",
        "In progress",
        "--scheduled",
    ]);

    match cli.command {
        Command::List {
            entity,
            start,
            end,
            statuses,
            scheduled,
        } => {
            assert_eq!(entity, Schedulable::Job);
            assert_eq!(start, Some(Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap()));
            assert_eq!(end, Some(Utc.with_ymd_and_hms(2023, 3, 1, 12, 30, 0).unwrap()));
            assert_eq!(statuses, vec!["Submitted", "In progress"]);
            assert!(scheduled);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_end_requires_start() {
    let result = Cli::try_parse_from(["workiz", "list", "leads", "--end", "2023-03-01"]);
    assert!(result.is_err());
}

#[test]
fn test_customers_cannot_be_listed() {
    let result = Cli::try_parse_from(["workiz", "list", "customer"]);
    assert!(result.is_err());
}

#[test]
fn test_crew_takes_many_names() {
    let cli = Cli::parse_from([
        "workiz",
        "crew",
        "lead",
        "SRUYUI",
        "Nathan Thomas",
        "Alissa Thomas",
    ]);

    match cli.command {
        Command::Crew { entity, id, names } => {
            assert_eq!(entity, Schedulable::Lead);
            assert_eq!(id, "SRUYUI");
            assert_eq!(names, vec!["Nathan Thomas", "Alissa Thomas"]);
        }
        _ => panic!("Expected Crew command"),
    }
}

#[test]
fn test_global_flags() {
    // --json before subcommand
    let cli = Cli::parse_from(["workiz", "--json", "team"]);
    assert!(cli.json);

    // --json and --config after subcommand (global flags)
    let cli = Cli::parse_from(["workiz", "team", "--json", "--config", "workiz.json"]);
    assert!(cli.json);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("workiz.json")));
}

#[test]
fn test_parse_when_rejects_garbage() {
    assert!(parse_when("next tuesday").is_err());
    assert!(parse_when("2023-02-30").is_err());
}
