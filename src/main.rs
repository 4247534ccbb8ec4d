use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use multiadd_codegen::{
    generate_adder, generate_design, lower_tree, ShiftRegisterGenerator, TestbenchGenerator,
};
use multiadd_manifest::{Manifest, OutputConfig, TestbenchConfig, TreeConfig};
use multiadd_plan::Design;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// multiadd - structural Verilog for multi-operand LUT/carry-chain adders
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the adder tree and every adder module it uses
    Generate {
        /// Operand width in bits
        #[arg(short, long)]
        width: Option<usize>,

        /// Number of operands
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Manifest file (multiadd.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a self-checking testbench
        #[arg(long)]
        testbench: bool,

        /// Also write a shift-register input wrapper
        #[arg(long)]
        shift_register: bool,

        /// Number of random testbench vectors
        #[arg(long)]
        vectors: Option<usize>,

        /// Testbench stimulus seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the planned tree and adder widths as JSON
    Plan {
        /// Operand width in bits
        #[arg(short, long)]
        width: usize,

        /// Number of operands
        #[arg(short = 'n', long)]
        count: usize,
    },

    /// Print a single carry-lookahead adder module
    Adder {
        /// Operand width in bits
        #[arg(short, long)]
        width: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            width,
            count,
            config,
            output,
            testbench,
            shift_register,
            vectors,
            seed,
        } => {
            let mut manifest = match config {
                Some(path) => multiadd_manifest::from_path(&path)
                    .with_context(|| format!("Failed to load manifest {}", path.display()))?,
                None => match (width, count) {
                    (Some(operand_width), Some(operand_count)) => Manifest {
                        tree: TreeConfig {
                            operand_width,
                            operand_count,
                        },
                        output: OutputConfig::default(),
                        testbench: TestbenchConfig::default(),
                    },
                    _ => bail!("either --config or both --width and --count are required"),
                },
            };

            // command line flags override the manifest
            if let Some(width) = width {
                manifest.tree.operand_width = width;
            }
            if let Some(count) = count {
                manifest.tree.operand_count = count;
            }
            if let Some(output) = output {
                manifest.output.dir = output.display().to_string();
            }
            manifest.output.testbench |= testbench;
            manifest.output.shift_register |= shift_register;
            if let Some(vectors) = vectors {
                manifest.testbench.vectors = vectors;
            }
            if let Some(seed) = seed {
                manifest.testbench.seed = seed;
            }
            manifest.validate()?;

            generate(&manifest)?;
        }

        Commands::Plan { width, count } => {
            let design = Design::plan(width, count)?;
            println!("{}", serde_json::to_string_pretty(&design.tree)?);
        }

        Commands::Adder { width } => {
            print!("{}", generate_adder(width)?);
        }
    }

    Ok(())
}

fn generate(manifest: &Manifest) -> Result<()> {
    let design = Design::plan(manifest.tree.operand_width, manifest.tree.operand_count)?;
    let out_dir = Path::new(&manifest.output.dir);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let interface = lower_tree(&design.tree)?.interface();
    write_output(out_dir, &interface.name, &generate_design(&design)?)?;

    if manifest.output.testbench {
        let tb = TestbenchGenerator::new(interface.clone())?
            .vectors(manifest.testbench.vectors)
            .seed(manifest.testbench.seed);
        write_output(out_dir, &tb.module_name(), &tb.generate())?;
    }

    if manifest.output.shift_register {
        let wrapper = ShiftRegisterGenerator::new(interface)?;
        write_output(out_dir, &wrapper.module_name(), &wrapper.generate())?;
    }

    Ok(())
}

fn write_output(dir: &Path, module: &str, contents: &str) -> Result<()> {
    let path = dir.join(format!("{module}.v"));
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    println!("{}", path.display());
    Ok(())
}
