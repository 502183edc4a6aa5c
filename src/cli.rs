use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "shelf-scan",
    about = "Clean a product export, infer categories, and rank category engagement",
    version
)]
pub struct Cli {
    /// Product export to analyze (delimited text with a header row)
    #[arg(default_value = "products.csv")]
    pub input: PathBuf,

    /// Text encoding of the input, as a WHATWG label (e.g. windows-1252, latin1) [default: from config, else windows-1252]
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Directory for tables, charts, and the PDF report
    #[arg(long, value_name = "DIR", default_value = "shelf-scan-out")]
    pub out: PathBuf,

    /// Config file [default: <input dir>/.shelf-scan/config.toml, fallback ~/.config/shelf-scan/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also list dropped rows and log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print a one-line summary
    #[arg(short, long)]
    pub quiet: bool,
}
