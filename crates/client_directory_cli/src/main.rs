//! CLI walkthrough for the client directory.
//!
//! # Responsibility
//! - Open the store described by an optional JSON settings file.
//! - Run each directory operation once and report its outcome.
//!
//! Each step reports its own failure. Later steps still run, except when schema
//! setup or the first insert fails.

use client_directory_core::db::open_with_settings;
use client_directory_core::{
    core_version, default_log_level, init_logging, ClientDirectory, ClientFilter, ClientId,
    ClientUpdate, ConnectionSettings, NewClient, SqliteClientRepository,
};
use log::warn;
use std::fmt::Display;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = init_logging(default_log_level(), None) {
        eprintln!("logging disabled: {err}");
    }

    let settings = match std::env::args().nth(1) {
        Some(path) => match ConnectionSettings::from_json_file(&path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("cannot load settings: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => ConnectionSettings::in_memory(),
    };

    let conn = match open_with_settings(&settings) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open store: {err}");
            return ExitCode::FAILURE;
        }
    };
    let directory = match SqliteClientRepository::try_new(&conn) {
        Ok(repo) => ClientDirectory::new(repo),
        Err(err) => {
            eprintln!("cannot use store: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("client_directory_core version={}", core_version());
    // Schema and the new client id are prerequisites; every later step needs them.
    if !report("ensure schema", directory.ensure_schema()) {
        return ExitCode::FAILURE;
    }

    let draft = NewClient::new("Yuri", "Cacheinvalidatovich", "yuri@example.com")
        .with_phones(["123456789", "987654321"]);
    let Some(client_id) = report_value("add client", directory.add_client(&draft)) else {
        return ExitCode::FAILURE;
    };
    println!("added client id={client_id}");

    run_updates(&directory, client_id);

    if let Some(rows) = report_value(
        "find clients",
        directory.find_clients(&ClientFilter::default().first_name("Yuri")),
    ) {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!("event=cli_print module=cli status=error error={err}"),
        }
    }

    report("delete client", directory.delete_client(client_id));
    ExitCode::SUCCESS
}

fn run_updates(directory: &ClientDirectory<SqliteClientRepository<'_>>, client_id: ClientId) {
    report("add phone", directory.add_phone(client_id, "555555555"));

    let update = ClientUpdate::default()
        .first_name("Yuri")
        .last_name("Cacheinvalidatovich")
        .email("yuri@example.com")
        .replace_phones(["111111111", "222222222"]);
    report("update client", directory.update_client(client_id, &update));

    if let Some(removed) = report_value(
        "delete phone",
        directory.delete_phone(client_id, "111111111"),
    ) {
        println!("removed {removed} phone row(s)");
    }
}

fn report<E: Display>(step: &str, result: Result<impl Sized, E>) -> bool {
    report_value(step, result).is_some()
}

fn report_value<T, E: Display>(step: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => {
            println!("{step}: ok");
            Some(value)
        }
        Err(err) => {
            eprintln!("{step}: failed: {err}");
            None
        }
    }
}
