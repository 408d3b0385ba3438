//! The generation pipeline: fetch, parse, select, emit, bind, write.

use std::path::PathBuf;

use anyhow::Result;
use glob::Pattern;
use log::{debug, info};

use crate::config::{self, Indent};
use crate::emit::Emitter;
use crate::io;
use crate::select;
use crate::registry::Registry;
use crate::template::{Notice, Template};

const DEFAULT_HEADER_TEMPLATE: &str = include_str!("../../templates/cl3w.h");
const DEFAULT_SOURCE_TEMPLATE: &str = include_str!("../../templates/cl3w.c");

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub root: PathBuf,
    pub cl_xml: String,
    pub cl_std: String,
    pub cl_ext: Option<PathBuf>,
    pub indent: Indent,
    pub template_dir: Option<PathBuf>,
    pub no_header: bool,
    pub no_license: bool,
}

pub fn run(config: &GenerateConfig) -> Result<()> {
    let raw = io::fetch_registry(&config.cl_xml)?;
    let registry = Registry::parse(&raw)?;
    debug!(
        "parsed {} commands, {} features, {} extensions",
        registry.commands.len(),
        registry.features.len(),
        registry.extensions.len()
    );

    let patterns: Vec<Pattern> = match &config.cl_ext {
        Some(path) => config::read_extension_patterns(path)?,
        None => Vec::new(),
    };
    let commands = select::select(&registry, &config.cl_std, &patterns)?;
    info!(
        "selected {} commands for OpenCL {}",
        commands.len(),
        config.cl_std
    );

    let emitter = Emitter::new(&commands, config.indent);
    let (header_text, source_text) = render(config, &emitter)?;

    let include_dir = config.root.join("include");
    let src_dir = config.root.join("src");
    io::ensure_dir(&include_dir)?;
    io::ensure_dir(&src_dir)?;
    io::write_file_atomic(&include_dir.join("cl3w.h"), &header_text)?;
    io::write_file_atomic(&src_dir.join("cl3w.c"), &source_text)?;
    Ok(())
}

/// Fully render both documents before either output file is touched.
fn render(config: &GenerateConfig, emitter: &Emitter<'_>) -> Result<(String, String)> {
    let (header_template, source_template) = load_templates(config)?;

    let mut header = Template::new(header_template);
    header.bind("typedefs", &emitter.pfn_typedefs())?;
    header.bind("api table", &emitter.api_table())?;
    header.bind("defines", &emitter.name_aliases())?;

    let mut source = Template::new(source_template);
    source.bind("api names", &emitter.name_table())?;
    source.bind("stub dummies", &emitter.fallback_stubs())?;
    source.bind("stub impls", &emitter.forwarding_impls())?;
    source.bind("reset apis", &emitter.reset_procedure())?;
    source.bind("probe api name", &emitter.probe_accessor()?)?;

    let notice = Notice::from_flags(config.no_header, config.no_license);
    Ok((header.render(notice), source.render(notice)))
}

fn load_templates(config: &GenerateConfig) -> Result<(String, String)> {
    match &config.template_dir {
        Some(dir) => {
            let header = io::read_file(&dir.join("cl3w.h"))?;
            let source = io::read_file(&dir.join("cl3w.c"))?;
            Ok((header, source))
        }
        None => Ok((
            DEFAULT_HEADER_TEMPLATE.to_string(),
            DEFAULT_SOURCE_TEMPLATE.to_string(),
        )),
    }
}
