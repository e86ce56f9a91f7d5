use clap::Parser;
use issuer_console::cli::{parse_data_field, Command, LicenseAction, SessionAction};
use issuer_console::{Cli, ConsoleNavigator};
use issuer_session::{Navigator, Route};
use issuer_types::LicenseDataField;
use pretty_assertions::assert_eq;

#[test]
fn global_flags_parse_after_subcommand() {
    let cli = Cli::try_parse_from([
        "issuer-console",
        "whoami",
        "--base-url",
        "https://licensing.example.com",
        "--state-file",
        "/tmp/state.json",
        "-v",
    ])
    .unwrap();
    assert_eq!(cli.base_url, "https://licensing.example.com");
    assert_eq!(cli.state_file.unwrap().to_str(), Some("/tmp/state.json"));
    assert!(cli.verbose);
    assert_eq!(cli.timeout, 60);
    assert!(matches!(cli.command, Command::Whoami));
}

#[test]
fn license_create_collects_repeated_data() {
    let cli = Cli::try_parse_from([
        "issuer-console",
        "licenses",
        "--issuer",
        "7",
        "create",
        "--name",
        "Workstation",
        "--data",
        "seats=5",
        "--data",
        "expr=a=b",
        "--valid-until",
        "2030-01-01",
    ])
    .unwrap();
    let Command::Licenses { issuer, action } = cli.command else {
        panic!("expected licenses command");
    };
    assert_eq!(issuer, Some(7));
    let LicenseAction::Create { input } = action else {
        panic!("expected create");
    };
    assert_eq!(input.name.as_deref(), Some("Workstation"));
    assert_eq!(
        input.data,
        vec![
            LicenseDataField::new("seats", "5"),
            LicenseDataField::new("expr", "a=b"),
        ]
    );
    assert_eq!(input.valid_until.as_deref(), Some("2030-01-01"));
}

#[test]
fn expiry_and_no_expiry_conflict() {
    let result = Cli::try_parse_from([
        "issuer-console",
        "licenses",
        "update",
        "abc",
        "--valid-until",
        "2030-01-01",
        "--no-expiry",
    ]);
    assert!(result.is_err());
}

#[test]
fn session_revoke_takes_license_and_session() {
    let cli =
        Cli::try_parse_from(["issuer-console", "sessions", "revoke", "lic/1", "sess+2"]).unwrap();
    let Command::Sessions { issuer, action } = cli.command else {
        panic!("expected sessions command");
    };
    assert_eq!(issuer, None);
    match action {
        SessionAction::Revoke { license, session } => {
            assert_eq!(license, "lic/1");
            assert_eq!(session, "sess+2");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn data_field_parser() {
    assert_eq!(
        parse_data_field(" seats =5").unwrap(),
        LicenseDataField::new("seats", "5")
    );
    assert_eq!(
        parse_data_field("empty=").unwrap(),
        LicenseDataField::new("empty", "")
    );
    assert!(parse_data_field("novalue").is_err());
}

#[test]
fn navigator_remembers_last_route() {
    let nav = ConsoleNavigator::new();
    assert_eq!(nav.last_route(), None);
    nav.navigate(Route::Home);
    assert_eq!(nav.last_route(), Some(Route::Home));
    nav.navigate(Route::Login);
    assert_eq!(nav.last_route(), Some(Route::Login));
}
