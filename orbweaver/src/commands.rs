use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("orbweaver")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("orbweaver")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about(
                    "Starts the visitor-tracking web server. Every request is \
                fingerprinted and woven into the web.",
                )
                .arg(
                    arg!(-b --"bind" <ADDRESS>)
                        .required(false)
                        .help("The address to bind the server to")
                        .default_value("127.0.0.1"),
                )
                .arg(
                    arg!(-p --"port" <PORT>)
                        .required(false)
                        .help("The port to listen on")
                        .value_parser(clap::value_parser!(u16))
                        .default_value("5000"),
                )
                .arg(
                    arg!(--"ttl-minutes" <MINUTES>)
                        .required(false)
                        .help("Minutes of inactivity before a visitor is swept from the web")
                        .value_parser(clap::value_parser!(i64))
                        .default_value("30"),
                ),
        )
        .subcommand(
            command!("inspect")
                .about("Classifies a user-agent string and prints the fingerprint")
                .arg(
                    arg!(-u --"user-agent" <UA>)
                        .required(true)
                        .help("The user-agent string to classify"),
                )
                .arg(
                    arg!(-i --"ip" <ADDRESS>)
                        .required(false)
                        .help("Client IP address to classify alongside the user-agent")
                        .default_value("unknown"),
                )
                .arg(
                    arg!(-j --"json")
                        .required(false)
                        .help("Print the full fingerprint as JSON instead of a summary")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
