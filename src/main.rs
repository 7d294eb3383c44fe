use std::path::PathBuf;
use std::thread;

use clap::{App, Arg, ArgMatches, SubCommand};
use color_eyre::eyre::{eyre, Result};
use time::OffsetDateTime;

use imap_status::bar::BarItem;
use imap_status::client::{Credentials, UnreadClient, UnreadSource};
use imap_status::config::{self, Config};
use imap_status::output::Printer;
use imap_status::palette::Palette;
use imap_status::paths;

fn app() -> App<'static, 'static> {
    App::new("imap-status")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bar item with unread IMAP messages count")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .env("IMAP_STATUS_CONFIG")
                .takes_value(true)
                .help("Config file to use instead of the default locations"),
        )
        .arg(
            Arg::with_name("palette")
                .short("p")
                .long("palette")
                .takes_value(true)
                .possible_values(&["plain", "ansi", "tmux"])
                .help("Color style of the bar, overrides the config"),
        )
        .subcommand(
            SubCommand::with_name("watch")
                .about("Print the bar item on every timer tick (default)")
                .arg(
                    Arg::with_name("every")
                        .long("every")
                        .help("Print on every tick, not only on change"),
                ),
        )
        .subcommand(SubCommand::with_name("once").about("Print the bar item once"))
        .subcommand(SubCommand::with_name("list").about("List mailboxes of the account"))
        .subcommand(SubCommand::with_name("init").about("Write the default config"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let matches = app().get_matches();
    let explicit = matches.value_of("config").map(PathBuf::from);
    let candidates = paths::resolve(explicit);

    if matches.subcommand_matches("init").is_some() {
        let path = paths::init_target(&candidates)?;
        config::write_default_config(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let path = paths::locate(&candidates)?;
    let config = config::read_config(&path)?;
    let palette = match matches.value_of("palette") {
        Some(name) => name.parse()?,
        None => config.palette,
    };

    match matches.subcommand() {
        ("list", _) => list(&config),
        ("once", _) => {
            let mut item = BarItem::new();
            println!("{}", render(&mut item, &config, palette));
            Ok(())
        }
        ("watch", Some(sub)) => watch(&config, palette, sub),
        _ => watch(&config, palette, &ArgMatches::default()),
    }
}

fn render<'a>(item: &'a mut BarItem, config: &Config, palette: Palette) -> &'a str {
    item.render(config, palette, OffsetDateTime::now_utc(), UnreadClient::connect)
}

fn watch(config: &Config, palette: Palette, matches: &ArgMatches) -> Result<()> {
    let mut printer = Printer::new(matches.is_present("every"));
    let mut item = BarItem::new();

    log::info!(
        "checking {} every {} minute(s)",
        config.mailboxes,
        config.interval
    );

    loop {
        let text = render(&mut item, config, palette);
        if let Some(line) = printer.line(text) {
            println!("{}", line);
        }
        thread::sleep(config.interval());
    }
}

fn list(config: &Config) -> Result<()> {
    let credentials = Credentials::from_config(config)
        .ok_or_else(|| eyre!("username, password, hostname and port must be set"))?;
    let mut client = UnreadClient::connect(&credentials)?;
    let boxes = client.list_boxes();
    client.logout();

    for name in boxes? {
        println!("{}", name);
    }
    Ok(())
}
