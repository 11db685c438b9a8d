use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};

use dihedra_cli::steps::{alignment, annotation, ensemble, pipeline, structure};
use dihedra_cli::{Config, StepSummary};

#[derive(Parser)]
#[command(name = "dihedra")]
#[command(version, about = "Backbone dihedral variability across homologous protein structures", long_about = None)]
struct Cli {
    /// Config TOML file
    #[arg(short, long, global = true, env = "DIHEDRA_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the first chain of each PDB as <stem>_Chain<ID>.pdb
    ExtractChain {
        /// PDB file or directory
        #[arg(short, long)]
        input: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Backbone phi/psi per residue, one <stem>_angles.csv per PDB
    Angles {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Align each chain onto a reference with TM-align
    Tmalign {
        /// Chain PDB file or directory
        #[arg(short, long)]
        input: PathBuf,
        /// Reference chain PDB
        #[arg(short, long)]
        reference: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Residue mappings from TM-align reports
    Map {
        /// TM-align report or directory of reports
        #[arg(short, long)]
        input: PathBuf,
        /// Directory holding the aligned chain PDBs
        #[arg(long)]
        pdb_dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Circular phi/psi deltas for each residue mapping
    Delta {
        /// Mapping file or directory
        #[arg(short, long)]
        input: PathBuf,
        /// Directory holding <chain>_angles.csv files
        #[arg(long)]
        angles_dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Concatenate delta tables per family subdirectory
    Aggregate {
        /// Directory of family subdirectories
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Per-residue phi/psi entropy of aggregated delta tables
    Entropy {
        /// Aggregated CSV or directory
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Secondary structure with mkdssp
    Dssp {
        /// PDB or .dssp file, or a directory
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Per-residue solvent accessibility from DSSP files
    Asa {
        /// .dssp file or directory
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Chain to report (defaults to the chain in the file name, else A)
        #[arg(long)]
        chain: Option<char>,
    },
    /// Per-residue average B-factors
    Bfactor {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Per-residue CA RMSD of each model against the first
    Rmsd {
        /// Multi-model PDB file or directory
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Chain sequences as one FASTA file
    Fasta {
        #[arg(short, long)]
        input: PathBuf,
        /// Output FASTA file
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 'A')]
        chain: char,
    },
    /// Run the whole pipeline
    Run {
        /// Directory of input PDB files
        #[arg(short, long)]
        input: PathBuf,
        /// Reference structure, by file name or path (defaults to the first input)
        #[arg(short, long)]
        reference: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();

    let config = match &cli.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    debug!("{:?}", config);

    let summary: StepSummary = match cli.command {
        Commands::ExtractChain { input, output } => structure::extract_chains(&input, &output)?,
        Commands::Angles { input, output } => structure::backbone_angles(&input, &output)?,
        Commands::Tmalign {
            input,
            reference,
            output,
        } => alignment::tmalign(
            &input,
            &reference,
            &output,
            &config.tmalign(),
            config.alignment.max_rmsd,
        )?,
        Commands::Map {
            input,
            pdb_dir,
            output,
        } => alignment::residue_mapping(&input, &pdb_dir, &output)?,
        Commands::Delta {
            input,
            angles_dir,
            output,
        } => alignment::deltas(&input, &angles_dir, &output)?,
        Commands::Aggregate { input, output } => ensemble::aggregate(&input, &output)?,
        Commands::Entropy { input, output } => {
            ensemble::entropy(&input, &output, &config.entropy_options()?, &config.families)?
        }
        Commands::Dssp { input, output } => {
            annotation::secondary_structure(&input, &output, &config.dssp())?
        }
        Commands::Asa {
            input,
            output,
            chain,
        } => annotation::accessibility(&input, &output, chain)?,
        Commands::Bfactor { input, output } => structure::b_factors(&input, &output)?,
        Commands::Rmsd { input, output } => structure::ensemble_rmsd(&input, &output)?,
        Commands::Fasta {
            input,
            output,
            chain,
        } => structure::sequences(&input, &output, chain)?,
        Commands::Run {
            input,
            reference,
            output,
        } => {
            let summary = pipeline::run(&config, &input, reference.as_deref(), &output)?;
            for (step, s) in &summary.steps {
                info!("{:<14} {} written, {} skipped", step, s.written.len(), s.skipped);
            }
            return Ok(());
        }
    };

    info!(
        "{} file(s) written, {} input(s) skipped",
        summary.written.len(),
        summary.skipped
    );
    Ok(())
}
