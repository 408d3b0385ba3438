use std::path::PathBuf;

use clap::Parser;

use crate::config::Indent;

const DEFAULT_CL_XML: &str = "https://github.com/KhronosGroup/OpenCL-Docs/raw/main/xml/cl.xml";

#[derive(Parser, Debug)]
#[command(name = "cl3w-gen")]
#[command(about = "Lazy OpenCL function loader generator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output root directory; include/ and src/ are created beneath it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// cl.xml registry location, either a URL or a local path
    #[arg(long = "cl-xml", default_value = DEFAULT_CL_XML)]
    pub cl_xml: String,

    /// Highest OpenCL standard whose commands are generated
    #[arg(long = "cl-std", default_value = "1.2")]
    pub cl_std: String,

    /// File listing extension name patterns, one per line, wildcard
    /// supported, # for comment
    #[arg(long = "cl-ext")]
    pub cl_ext: Option<PathBuf>,

    /// Indentation unit for generated code
    #[arg(long, value_enum, default_value = "4")]
    pub indent: Indent,

    /// Directory holding cl3w.h/cl3w.c templates instead of the built-in pair
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Skip the attribution header on generated files
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Skip the license text in the attribution header
    #[arg(long = "no-license")]
    pub no_license: bool,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
