use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use orbweaver::server;
use orbweaver_core::print_banner;
use orbweaver_detect::ClientDetector;
use std::collections::HashMap;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        Some(("inspect", primary_command)) => handle_inspect(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_serve(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let bind = sub_matches.get_one::<String>("bind").unwrap();
    let port = sub_matches.get_one::<u16>("port").unwrap();
    let ttl_minutes = sub_matches.get_one::<i64>("ttl-minutes").unwrap();

    println!("\n🕸️  Weaving at http://{}:{}", bind, port);
    println!("Visitor TTL: {} minutes\n", ttl_minutes);

    if let Err(e) = server::serve(bind, *port, *ttl_minutes).await {
        eprintln!("✗ Server failed: {}", e);
        std::process::exit(1);
    }
}

fn handle_inspect(sub_matches: &ArgMatches) {
    let user_agent = sub_matches.get_one::<String>("user-agent").unwrap();
    let ip = sub_matches.get_one::<String>("ip").unwrap();
    let as_json = sub_matches.get_flag("json");

    let detector = ClientDetector::new();
    let profile = detector.analyze(user_agent, ip, &HashMap::new());

    if as_json {
        match serde_json::to_string_pretty(&profile) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("✗ Failed to serialize fingerprint: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("\n{}", "Client fingerprint".bold());
    println!("  Browser:  {}", profile.summary.browser_full.cyan());
    println!("  Engine:   {}", profile.browser.engine);
    println!("  OS:       {}", profile.summary.os_full.cyan());
    println!(
        "  Arch:     {}",
        profile.operating_system.architecture.as_str()
    );
    println!("  Device:   {}", profile.summary.device_full.cyan());
    println!("  Network:  {}", profile.network.network_type.as_str());
    let threat = profile.network.threat_level.as_str();
    let threat_colored = match profile.network.threat_level {
        orbweaver_detect::profile::ThreatLevel::Low => threat.green(),
        orbweaver_detect::profile::ThreatLevel::Medium => threat.yellow(),
        orbweaver_detect::profile::ThreatLevel::High => threat.red(),
    };
    println!("  Threat:   {}", threat_colored);
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
