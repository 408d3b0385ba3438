use anyhow::Result;
use clap::Parser;
use cl3w_gen::cli::Cli;
use cl3w_gen::commands::generate::{self, GenerateConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);
    generate::run(&build_config(cli))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_config(cli: Cli) -> GenerateConfig {
    GenerateConfig {
        root: cli.root,
        cl_xml: cli.cl_xml,
        cl_std: cli.cl_std,
        cl_ext: cli.cl_ext,
        indent: cli.indent,
        template_dir: cli.template_dir,
        no_header: cli.no_header,
        no_license: cli.no_license,
    }
}
