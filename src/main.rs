use activedoc::{ActiveDocError, Document, DomainConfig, Projection, SearchOptions};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Read and write XML documents by element path, and compile search options.
#[derive(Parser, Debug)]
#[command(name = "activedoc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print what a path selects: text, one line per list item, or markup.
    Read {
        file: PathBuf,
        path: String,
        /// Domain configuration (JSON) with namespaces and fields.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Namespace URI applied to every step of the path.
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Replace the text of one simple element and print the document.
    Write {
        file: PathBuf,
        path: String,
        value: String,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Compile a JSON constraint description into an options document.
    Options { file: PathBuf },
}

fn load_document(file: &Path, config: Option<&Path>) -> Result<Document, ActiveDocError> {
    let config = match config {
        Some(path) => DomainConfig::from_file(path)?,
        None => DomainConfig::default(),
    };
    let text = fs::read_to_string(file)?;
    Document::parse_with(&text, &config)
}

fn run(cli: Cli) -> Result<String, ActiveDocError> {
    match cli.command {
        Command::Read {
            file,
            path,
            config,
            namespace,
        } => {
            let document = load_document(&file, config.as_deref())?;
            match document.read_in(&path, namespace.as_deref())? {
                Projection::Empty => Ok(String::new()),
                Projection::Text(text) => Ok(text),
                Projection::TextList(texts) => Ok(texts.join("\n")),
                Projection::View(view) => view.to_xml(),
            }
        }
        Command::Write {
            file,
            path,
            value,
            config,
            namespace,
        } => {
            let mut document = load_document(&file, config.as_deref())?;
            document.write_in(&path, &value, namespace.as_deref())?;
            document.to_xml()
        }
        Command::Options { file } => {
            let text = fs::read_to_string(file)?;
            Ok(SearchOptions::from_json(&text)?.serialize()?)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
