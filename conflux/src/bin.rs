use anyhow::Result;
use clap::{App, Arg};

pub fn main() -> Result<()> {

    let options = App::new("conflux")
        .version("1.0")
        .about("Reconciles an incoming roster extract onto the master schema and merges the two")
        .arg(Arg::with_name("CHARTER")
            .help("The charter yaml file")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("TYPE")
            .help("The dataset type to merge, as defined in the charter")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("MASTER")
            .help("The master csv file carrying the canonical schema")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("INCOMING")
            .help("The incoming csv extract to reconcile and merge")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("OUTPUT")
            .help("Where to write the merged csv file")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("report")
            .long("report")
            .help("Where to write the merge report json")
            .takes_value(true))
        .get_matches();

    dotenv::dotenv().ok();
    let _ = env_logger::try_init();

    log::info!("{}", BANNER);

    conflux::run_merge_job(
        options.value_of("CHARTER").unwrap(),
        options.value_of("TYPE").unwrap(),
        options.value_of("MASTER").unwrap(),
        options.value_of("INCOMING").unwrap(),
        options.value_of("OUTPUT").unwrap(),
        options.value_of("report"))?;

    Ok(())
}

const BANNER: &str = r#"
  ____ ___  _   _ _____ _    _   _ __  __
 / ___/ _ \| \ | |  ___| |  | | | |\ \/ /
| |  | | | |  \| | |_  | |  | | | | \  /
| |__| |_| | |\  |  _| | |__| |_| | /  \
 \____\___/|_| \_|_|   |_____\___/ /_/\_\
 Conflux: Roster Merger
"#;
