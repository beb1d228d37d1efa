pub mod error;
pub mod graph;
pub mod registry;
pub mod visitor;

pub use error::RegistryError;
pub use registry::VisitorRegistry;
pub use visitor::{CenterNode, VisitorRecord};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
       .      .
    .  |  .   |   .
     \ | /  \ | /
   ---(o)----(o)---     orbweaver
     / | \  / | \       every visitor leaves a thread
    '  |  ' |    '
       '      '
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{} {}\n",
        "orbweaver".bright_white().bold(),
        env!("CARGO_PKG_VERSION").cyan()
    );
}
