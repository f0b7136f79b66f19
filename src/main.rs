use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use word_association::{
    DEFAULT_DEPTH, MODULARITY_COLUMN, NUM_CLASSES, RenderMode, SynonymGraph, SynonymSource,
    WordGraph, add_synonyms, build_adjacency, open_source, read_word_list, save_gml, top_values,
};

/// Build word-association graphs from a synonym source.
#[derive(Parser)]
#[command(name = "word-association")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// WordNet dict/ directory
    #[arg(long, env = "WORDNET_DIR")]
    wordnet: Option<PathBuf>,

    /// JSON thesaurus mapping words to synonym groups (takes precedence over --wordnet)
    #[arg(long)]
    thesaurus: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up every word of a word list once and save the graph as GML
    Sequential {
        /// Newline-delimited word list
        #[arg(long, default_value = "400k_words_alpha.txt")]
        words: PathBuf,

        /// GML output file
        #[arg(short, long, default_value = "top_400k.gml")]
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Expand the synonyms of a seed word recursively and draw the graph
    Recursive {
        /// Word to start from
        #[arg(long, default_value = "dog")]
        seed: String,

        /// Expansion depth
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,

        /// Word whose synonym count is printed afterwards
        #[arg(long, default_value = "book")]
        count_word: String,

        /// DOT output file
        #[arg(long, default_value = "synonyms.dot")]
        dot: PathBuf,

        /// Rendered image
        #[arg(long, default_value = "synonyms.png")]
        image: PathBuf,

        /// Only write the DOT file
        #[arg(long)]
        no_render: bool,

        /// Render the image but do not open it
        #[arg(long, conflicts_with = "no_render")]
        no_open: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Report the most frequent modularity classes in a node table
    Analyze {
        /// CSV node table
        #[arg(short, long, default_value = "top_400k.csv")]
        input: PathBuf,

        /// Column to count
        #[arg(long, default_value = MODULARITY_COLUMN)]
        column: String,

        /// Number of classes to report
        #[arg(long, default_value_t = NUM_CLASSES)]
        top: usize,
    },
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Sequential {
            words,
            output,
            source,
        } => {
            let source = open_source(source.wordnet.as_deref(), source.thesaurus.as_deref())?;

            // 1. Read the vocabulary
            let words = read_word_list(&words)?;
            println!("file read");

            // 2. One lookup per word
            let adjacency = build_adjacency(&source, &words);
            println!("adj dict done");

            // 3. Build and save the graph
            let graph = WordGraph::from_adjacency(&adjacency);
            println!("graph generated");

            save_gml(&graph, &output)?;
            println!("graph saved");
        }

        Commands::Recursive {
            seed,
            depth,
            count_word,
            dot,
            image,
            no_render,
            no_open,
            source,
        } => {
            let source = open_source(source.wordnet.as_deref(), source.thesaurus.as_deref())?;

            let mut graph = SynonymGraph::new();
            add_synonyms(&source, &mut graph, &seed, depth);
            let mode = if no_render {
                RenderMode::DotOnly
            } else if no_open {
                RenderMode::Image
            } else {
                RenderMode::ImageAndOpen
            };
            graph.visualize(&dot, &image, mode)?;

            println!("{}", source.synonyms(&count_word).len());
        }

        Commands::Analyze { input, column, top } => {
            for (class, count) in top_values(&input, &column, top)? {
                println!("Modularity Class {class}, Count: {count}");
            }
        }
    }

    Ok(())
}
