use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::LevelFilter;
use structopt::StructOpt;

use tiledawg::alphabet::TileAlphabet;
use tiledawg::codec::NodeFormat;
use tiledawg::compile::{read_bytes_per_node_file, read_u32_file, Compiler};
use tiledawg::config::CompileConfig;
use tiledawg::dump;
use tiledawg::reader::{NodeFileSet, NodeLookup};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tiledawg",
    about = "Compile word lists into tile-indexed DAWG dictionaries."
)]
struct Args {
    #[structopt(short, long, parse(from_occurrences), help = "raise log verbosity (-v, -vv, -vvv)")]
    verbose: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    #[structopt(about = "Build node files from a letter map and a word list")]
    Compile(CompileArgs),

    #[structopt(about = "Print every word stored in emitted node files")]
    Dump(DumpArgs),

    #[structopt(about = "Print node count, files and side-file values")]
    Info(InfoArgs),
}

#[derive(Debug, StructOpt)]
struct CompileArgs {
    #[structopt(long, parse(from_os_str), help = "JSON config file; flags override its values")]
    config: Option<PathBuf>,

    #[structopt(short, long, parse(from_os_str), help = "letter map, one byte per tile")]
    map_file: Option<PathBuf>,

    #[structopt(long, help = "letter map entries are 16-bit big-endian")]
    wide_map: bool,

    #[structopt(long, help = "input words are UTF-8")]
    multibyte: bool,

    #[structopt(short, long, parse(from_os_str), help = "word list (default: stdin)")]
    input: Option<PathBuf>,

    #[structopt(short, long, parse(from_os_str), help = "node files are written as <BASE>_NNN.bin")]
    output_base: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    start_node_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    word_count_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    bytes_per_node_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str), help = "write a JSON report of the run")]
    report_file: Option<PathBuf>,

    #[structopt(long)]
    max_bytes_per_file: Option<u64>,

    #[structopt(long)]
    min_len: Option<usize>,

    #[structopt(long)]
    max_len: Option<usize>,

    #[structopt(long, help = "word terminator as a byte value (default: 10)")]
    terminator: Option<u8>,

    #[structopt(long, help = "input is already in tile order; do not sort")]
    presorted: bool,

    #[structopt(long, help = "drop words with unmapped characters instead of failing")]
    lenient: bool,

    #[structopt(long, help = "always use 4 bytes per node")]
    force_four: bool,

    #[structopt(long, help = "write the dictionary as text to stderr")]
    dump_text: bool,

    #[structopt(long, help = "byte budget for buffering unsorted input")]
    pool_size: Option<usize>,
}

#[derive(Debug, StructOpt)]
struct DumpArgs {
    #[structopt(short, long, parse(from_os_str))]
    base: PathBuf,

    #[structopt(long)]
    bytes_per_node: Option<usize>,

    #[structopt(long, parse(from_os_str))]
    bytes_per_node_file: Option<PathBuf>,

    #[structopt(long, default_value = "0")]
    start: u32,

    #[structopt(short, long, parse(from_os_str), help = "render words by tile face")]
    map_file: Option<PathBuf>,

    #[structopt(long)]
    wide_map: bool,
}

#[derive(Debug, StructOpt)]
struct InfoArgs {
    #[structopt(short, long, parse(from_os_str))]
    base: PathBuf,

    #[structopt(long)]
    bytes_per_node: Option<usize>,

    #[structopt(long, parse(from_os_str))]
    bytes_per_node_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    word_count_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    start_node_file: Option<PathBuf>,
}

impl CompileArgs {
    fn into_config(self) -> anyhow::Result<CompileConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => CompileConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => CompileConfig::default(),
        };

        macro_rules! set {
            ($field:ident, $value:expr) => {
                if let Some(v) = $value {
                    config.$field = v;
                }
            };
        }

        set!(max_bytes_per_file, self.max_bytes_per_file);
        set!(min_word_len, self.min_len);
        set!(max_word_len, self.max_len);
        set!(terminator, self.terminator);
        set!(pool_size, self.pool_size);

        if self.map_file.is_some() {
            config.map_file = self.map_file;
        }
        if self.input.is_some() {
            config.input_file = self.input;
        }
        if self.output_base.is_some() {
            config.output_base = self.output_base;
        }
        if self.start_node_file.is_some() {
            config.start_node_file = self.start_node_file;
        }
        if self.word_count_file.is_some() {
            config.word_count_file = self.word_count_file;
        }
        if self.bytes_per_node_file.is_some() {
            config.bytes_per_node_file = self.bytes_per_node_file;
        }
        if self.report_file.is_some() {
            config.report_file = self.report_file;
        }

        config.wide_map |= self.wide_map;
        config.multibyte_input |= self.multibyte;
        config.force_four_byte_nodes |= self.force_four;
        config.dump_text |= self.dump_text;
        if self.presorted {
            config.sort_input = false;
        }
        if self.lenient {
            config.kill_on_unmapped_char = false;
        }

        Ok(config)
    }
}

fn node_format(bytes: Option<usize>, file: Option<&Path>) -> anyhow::Result<NodeFormat> {
    match (bytes, file) {
        (Some(bytes), _) => Ok(NodeFormat::from_bytes_per_node(bytes)?),
        (None, Some(path)) => read_bytes_per_node_file(path)
            .with_context(|| format!("reading {}", path.display())),
        (None, None) => bail!("one of --bytes-per-node or --bytes-per-node-file is required"),
    }
}

fn compile(args: CompileArgs) -> anyhow::Result<()> {
    let config = args.into_config()?;
    let report = Compiler::new(config).run()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn dump_words(args: DumpArgs) -> anyhow::Result<()> {
    let format = node_format(args.bytes_per_node, args.bytes_per_node_file.as_deref())?;
    let set = NodeFileSet::discover(&args.base, format)?;
    if set.node_count() == 0 {
        log::warn!("no node files found for {}", args.base.display());
    }

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    match args.map_file {
        Some(path) => {
            let alphabet = TileAlphabet::load(&path, args.wide_map)?;
            let count = dump::write_words(&set, args.start, &alphabet, &mut stdout)?;
            log::info!("{} words", count);
        }
        None => {
            let words = dump::words(&set, args.start)?;
            for word in &words {
                writeln!(stdout, "{}", word)?;
            }
            log::info!("{} words", words.len());
        }
    }

    Ok(())
}

fn info(args: InfoArgs) -> anyhow::Result<()> {
    let format = node_format(args.bytes_per_node, args.bytes_per_node_file.as_deref())?;
    let set = NodeFileSet::discover(&args.base, format)?;

    println!("bytes per node: {}", format.bytes_per_node());
    println!("nodes: {}", set.node_count());
    for path in set.paths() {
        println!("file: {}", path.display());
    }
    if let Some(path) = args.word_count_file {
        println!("word count: {}", read_u32_file(&path)?);
    }
    if let Some(path) = args.start_node_file {
        println!("start node: {}", read_u32_file(&path)?);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::from_args();
    init_logging(args.verbose);

    match args.command {
        Command::Compile(args) => compile(args),
        Command::Dump(args) => dump_words(args),
        Command::Info(args) => info(args),
    }
}
