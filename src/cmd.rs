//! Command line interface

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use kdam::{tqdm, BarExt};

use crate::domain::Domain;
use crate::error::Result;
use crate::io::write_expressions_file;
use crate::logic::{simplify_bit, Reading, RowSelection, SimplifyReport};
use crate::ops::BuiltinOp;
use crate::synth::{Synthesis, SynthesisConfig, Synthesizer, DEFAULT_MAX_DOMAIN_SIZE};
use crate::table::Pairing;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Show more details: once for each pass, twice for each removed term
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize a sum-of-products expression for each output bit of an operation
    ///
    /// All pairs of operands are enumerated, and each output bit gets the terms of the pairs
    /// that set it. Redundant terms are then removed.
    #[clap(alias = "syn")]
    Synth(SynthArgs),

    /// Show the truth table of an operation
    ///
    /// Each distinct result is listed with the last pair of operands producing it.
    #[clap()]
    Table(TableArgs),

    /// Compare the synthesized expressions with the truth table
    ///
    /// Only possible for widths small enough to build lookup tables over both operands.
    #[clap()]
    Check(CheckArgs),
}

/// Operation, domain and enumeration, shared by all commands
#[derive(Args)]
pub struct RunArgs {
    /// Operation to synthesize
    #[arg(long, value_enum)]
    op: BuiltinOp,

    /// Width of operands and results: 2, 8, 32 or 64
    #[arg(short = 'w', long, default_value_t = 8)]
    width: usize,

    /// Smallest operand
    #[arg(long, default_value_t = 0)]
    min: u64,

    /// Largest operand, excluded. Defaults to all values of the width, up to the domain limit
    #[arg(long)]
    max: Option<u64>,

    /// Enumerate unordered pairs only; the operation should be commutative
    #[arg(long)]
    commutative: bool,

    /// Do not pair an operand with itself
    #[arg(long)]
    no_self_pairs: bool,

    /// Only use the last pair recorded for each distinct result
    #[arg(long)]
    distinct: bool,

    /// Maximum number of operands
    #[arg(long, default_value_t = DEFAULT_MAX_DOMAIN_SIZE)]
    max_domain_size: usize,

    /// Seed to shuffle the operands before enumeration
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn config(&self) -> Result<SynthesisConfig> {
        let rows = if self.distinct {
            RowSelection::Distinct
        } else {
            RowSelection::All
        };
        Ok(SynthesisConfig::new(self.width)?
            .with_pairing(Pairing::select(self.commutative, !self.no_self_pairs))
            .with_rows(rows)
            .with_max_domain_size(self.max_domain_size))
    }

    fn domain(&self, config: &SynthesisConfig) -> Result<Domain> {
        let max = self.max.unwrap_or_else(|| {
            let all = config.width.mask().saturating_add(1);
            all.min(self.min.saturating_add(config.max_domain_size as u64))
        });
        let mut domain = Domain::bounded_range(self.min..max, config.max_domain_size)?;
        if let Some(s) = self.seed {
            domain.shuffle(s);
        }
        Ok(domain)
    }

    fn synthesizer(&self, config: SynthesisConfig) -> Result<Synthesizer<'static>> {
        let domain = self.domain(&config)?;
        if self.commutative && !self.op.is_commutative() {
            log::warn!("Enumerating unordered pairs for non-commutative operation {}", self.op);
        }
        Ok(Synthesizer::new(config)
            .domain(domain)
            .operation(self.op.as_fn()))
    }
}

/// Run the synthesis, simplifying the outputs one by one with a progress bar
fn run_with_progress(synthesizer: &Synthesizer) -> Result<Synthesis> {
    let config = synthesizer.config();
    let (table, mut expressions) = synthesizer.extract()?;
    if !config.simplify {
        return Ok(Synthesis {
            table,
            expressions,
            report: None,
        });
    }
    let mut progress = tqdm!(total = expressions.nb_outputs());
    progress.set_description("Outputs simplified");
    progress.write(format!(
        "Simplifying {} terms over {} outputs",
        expressions.nb_terms(),
        expressions.nb_outputs()
    ))?;
    let mut report = SimplifyReport::new();
    for bit in 0..expressions.nb_outputs() {
        report.merge(simplify_bit(
            bit,
            expressions.output_mut(bit),
            config.max_passes,
        ));
        progress.set_postfix(format!("removed={}", report.nb_removed()));
        progress.update(1)?;
    }
    eprintln!();
    Ok(Synthesis {
        table,
        expressions,
        report: Some(report),
    })
}

/// Command arguments for synthesis
#[derive(Args)]
pub struct SynthArgs {
    #[command(flatten)]
    common: RunArgs,

    /// Keep every extracted term
    #[arg(long)]
    no_simplify: bool,

    /// Maximum number of simplification passes
    #[arg(long, default_value_t = crate::logic::DEFAULT_MAX_PASSES)]
    max_passes: usize,

    /// Output file for the expressions; .bench files get a netlist
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write full minterms to .bench files, with inverted inputs, instead of positive literals
    #[arg(long)]
    minterms: bool,
}

impl SynthArgs {
    /// Run the synthesis and print the expressions
    pub fn run(&self) -> Result<()> {
        let config = self
            .common
            .config()?
            .with_simplify(!self.no_simplify)
            .with_max_passes(self.max_passes);
        let synthesizer = self.common.synthesizer(config)?;
        let synthesis = run_with_progress(&synthesizer)?;
        println!(
            "Synthesis of {} over {} bits:",
            self.common.op,
            synthesizer.config().width
        );
        print!("{}", synthesis.expressions);
        println!();
        println!("Stats:");
        println!("  Rows: {}", synthesis.table.nb_rows());
        println!("  Distinct results: {}", synthesis.table.nb_entries());
        println!("  Terms: {}", synthesis.expressions.nb_terms());
        if let Some(report) = &synthesis.report {
            println!("  Passes: {}", report.nb_passes());
            println!("  Removed: {}", report.nb_removed());
            if !report.converged {
                println!("  No fixpoint reached");
            }
        }
        if let Some(path) = &self.output {
            let reading = if self.minterms {
                Reading::Minterm
            } else {
                Reading::Literals
            };
            write_expressions_file(path, &synthesis.expressions, reading)?;
        }
        Ok(())
    }
}

/// Command arguments for truth table display
#[derive(Args)]
pub struct TableArgs {
    #[command(flatten)]
    common: RunArgs,
}

impl TableArgs {
    /// Print the truth table
    pub fn run(&self) -> Result<()> {
        let synthesizer = self.common.synthesizer(self.common.config()?)?;
        let table = synthesizer.generate_table()?;
        print!("{}", table);
        Ok(())
    }
}

/// Command arguments for checking the expressions
#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    common: RunArgs,

    /// Check the expressions after simplification
    #[arg(long)]
    simplify: bool,
}

impl CheckArgs {
    /// Compare both readings of the expressions with the table
    pub fn run(&self) -> Result<()> {
        let config = self.common.config()?.with_simplify(self.simplify);
        let synthesis = self.common.synthesizer(config)?.run()?;
        for (reading, name) in [
            (Reading::Minterm, "minterm"),
            (Reading::Literals, "literal"),
        ] {
            match synthesis.mismatches(reading) {
                None => {
                    println!("Width too large to compare lookup tables");
                    return Ok(());
                }
                Some(bits) if bits.is_empty() => {
                    println!("All outputs match the table with the {} reading", name);
                }
                Some(bits) => {
                    let st = bits
                        .iter()
                        .map(|b| format!("c{}", b))
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("Outputs differing with the {} reading: {}", name, st);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};
    use crate::error::{ConfigurationError, SynthError};
    use crate::synth::DEFAULT_MAX_DOMAIN_SIZE;
    use crate::table::Pairing;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_synth() {
        let cli = Cli::parse_from([
            "bitsynth",
            "synth",
            "--op",
            "mul",
            "-w",
            "2",
            "--no-self-pairs",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Synth(args) = cli.command else {
            panic!("Expected the synth command");
        };
        let config = args.common.config().unwrap();
        assert_eq!(config.pairing, Pairing::Permutations);
        let domain = args.common.domain(&config).unwrap();
        assert_eq!(domain.values(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_default_domain_is_bounded() {
        let cli = Cli::parse_from(["bitsynth", "table", "--op", "add", "-w", "32", "--min", "10"]);
        let Commands::Table(args) = cli.command else {
            panic!("Expected the table command");
        };
        let config = args.common.config().unwrap();
        let domain = args.common.domain(&config).unwrap();
        assert_eq!(domain.len(), config.max_domain_size);
        assert_eq!(domain.values()[0], 10);
    }

    #[test]
    fn test_large_range_rejected() {
        let cli = Cli::parse_from([
            "bitsynth",
            "synth",
            "--op",
            "add",
            "-w",
            "32",
            "--max",
            "4294967295",
        ]);
        let Commands::Synth(args) = cli.command else {
            panic!("Expected the synth command");
        };
        let config = args.common.config().unwrap();
        assert!(matches!(
            args.common.domain(&config),
            Err(SynthError::Configuration(ConfigurationError::DomainTooLarge {
                limit: DEFAULT_MAX_DOMAIN_SIZE,
                ..
            }))
        ));
        assert!(args.run().is_err());
    }

    #[test]
    fn test_unsupported_width() {
        let cli = Cli::parse_from(["bitsynth", "check", "--op", "add", "-w", "4"]);
        let Commands::Check(args) = cli.command else {
            panic!("Expected the check command");
        };
        assert!(args.run().is_err());
    }
}
