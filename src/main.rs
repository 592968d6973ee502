use std::io::Write;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};

use crate::model::config::Config;
use crate::model::config_sort::SortMode;
use crate::processing::processor::playlist;
use crate::utils::file::config_reader;

mod m3u_generator_error;
mod model;
mod processing;
mod repository;
mod utils;

const LOG_ENV: &str = "RUST_LOG";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "m3u-generator")]
#[command(version, about = "M3U playlist generator for live channel catalogs", long_about = None)]
struct Args {
    /// The config file
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,

    /// Channel order, chno or name. Overrides the sort of every source
    #[arg(short = 's', long = "sort")]
    sort: Option<String>,

    /// Output file name, only allowed with a single source
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Log level or env_logger filter, e.g. info,reqwest=warn
    #[arg(short = 'l', long = "log-level")]
    log_level: Option<String>,

    /// Skip stream negotiation, every channel gets the fallback url
    #[arg(long = "no-resolve", default_value_t = false)]
    no_resolve: bool,
}

fn main() {
    let args = Args::parse();

    let cfg_result = config_reader::read_config(args.config_file.as_deref());
    let config_log_level = cfg_result.as_ref().ok().and_then(|cfg| cfg.get_log_level().map(ToString::to_string));
    init_logger(args.log_level.as_deref().or(config_log_level.as_deref()));

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if let Some(build_time) = option_env!("VERGEN_BUILD_TIMESTAMP") {
        info!("Build time: {build_time}");
    }

    let mut cfg = match cfg_result {
        Ok(cfg) => cfg,
        Err(err) => exit!("{}", err.message),
    };
    apply_arguments(&args, &mut cfg);
    info!("Working dir: {}", &cfg.working_dir);

    playlist::exec_processing(&cfg);
}

fn apply_arguments(args: &Args, cfg: &mut Config) {
    if let Some(sort) = args.sort.as_deref() {
        let sort_mode = SortMode::from(sort);
        cfg.sources.iter_mut().for_each(|source| source.sort = sort_mode);
    }
    if let Some(output) = args.output.as_deref() {
        if cfg.sources.len() != 1 {
            exit!("--output can only be used with a single source, {} configured", cfg.sources.len());
        }
        cfg.sources[0].filename = output.to_string();
    }
    if args.no_resolve {
        cfg.provider.enabled = false;
    }
}

fn init_logger(user_log_level: Option<&str>) {
    let mut log_builder = Builder::from_default_env();
    log_builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    let env_log_level = std::env::var(LOG_ENV).ok();
    let log_level = user_log_level.map(ToString::to_string)
        .or(env_log_level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    if log_level.contains('=') {
        log_builder.parse_filters(&log_level);
    } else {
        let level = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
        log_builder.filter_level(level);
    }
    log_builder.init();
}
