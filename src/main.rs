use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use log::info;
use ndarray::Array2;
use phylobasis::balance::BalanceTest;
use phylobasis::{Basis, Tree, parse_newick_file};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Phylogenetic isometric log-ratio bases for compositional data
#[derive(Parser, Debug)]
#[command(version, about, long_about, term_width = 80)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the orthonormal basis of a bifurcating tree as TSV
    Basis(BasisArgs),

    /// Test the balances of a sample table across groups
    #[command(alias = "test")]
    Balances(BalanceArgs),
}

#[derive(Args, Debug)]
struct TreeArgs {
    /// Newick file; one or more trees separated by ';'
    tree: PathBuf,

    /// Which tree of the file to use (0-based)
    #[arg(long, default_value_t = 0)]
    tree_index: usize,
}

#[derive(Args, Debug)]
struct BasisArgs {
    #[command(flatten)]
    tree: TreeArgs,

    /// Print log-ratio coefficients instead of simplex rows
    #[arg(long)]
    log_ratio: bool,

    /// Number of decimals
    #[arg(short, long, default_value_t = 6)]
    precision: usize,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    #[command(flatten)]
    tree: TreeArgs,

    /// TSV table: header `sample<TAB>feature...`, one sample per line
    #[arg(long)]
    table: PathBuf,

    /// TSV grouping: `sample<TAB>group` per line
    #[arg(long)]
    groups: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.commands {
        Commands::Basis(args) => run_basis(args)?,
        Commands::Balances(args) => run_balances(args)?,
    }

    Ok(())
}

fn run_basis(args: &BasisArgs) -> Result<()> {
    let tree = read_tree(&args.tree)?;
    let basis = Basis::from_tree(&tree)?;
    let matrix = if args.log_ratio {
        basis.log_ratio()
    } else {
        basis.matrix()
    };

    println!("node\t{}", basis.leaf_labels(&tree).join("\t"));
    for (&node, row) in basis.nodes().iter().zip(matrix.rows()) {
        let values: Vec<String> = row
            .iter()
            .map(|v| format!("{:.*}", args.precision, v))
            .collect();
        println!("{}\t{}", node_name(&tree, node), values.join("\t"));
    }
    Ok(())
}

fn run_balances(args: &BalanceArgs) -> Result<()> {
    let tree = read_tree(&args.tree)?;
    let (samples, features, table) = read_table(&args.table)?;
    let grouping = read_grouping(&args.groups, &samples)?;
    info!(
        "testing {} samples x {} features",
        table.nrows(),
        table.ncols()
    );

    let report = BalanceTest::new().run(&tree, &table, &features, &grouping)?;

    println!("node\tstatistic\tp_value");
    for result in report.results() {
        println!(
            "{}\t{}\t{}",
            node_name(&tree, result.node),
            result.statistic,
            result.p_value
        );
    }
    Ok(())
}

fn read_tree(args: &TreeArgs) -> Result<Tree> {
    let mut trees = parse_newick_file(&args.tree)
        .with_context(|| format!("failed to parse {}", args.tree.display()))?;
    info!("read {} trees from {}", trees.len(), args.tree.display());
    if args.tree_index >= trees.len() {
        bail!(
            "tree index {} out of range, file has {} trees",
            args.tree_index,
            trees.len()
        );
    }
    Ok(trees.swap_remove(args.tree_index))
}

fn node_name(tree: &Tree, node: usize) -> String {
    match tree[node].label() {
        Some(label) => label.to_string(),
        None => format!("#{node}"),
    }
}

fn data_lines(path: &Path) -> Result<Vec<Vec<String>>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.split('\t').map(|s| s.trim().to_string()).collect())
        .collect())
}

/// Returns sample names, feature names and the values of a TSV table.
fn read_table(path: &Path) -> Result<(Vec<String>, Vec<String>, Array2<f64>)> {
    let mut lines = data_lines(path)?.into_iter();
    let header = lines
        .next()
        .ok_or_else(|| anyhow!("{} is empty", path.display()))?;
    let features: Vec<String> = header.into_iter().skip(1).collect();

    let mut samples = Vec::new();
    let mut values = Vec::new();
    for (line_no, fields) in lines.enumerate() {
        if fields.len() != features.len() + 1 {
            bail!(
                "{}: row {} has {} fields, expected {}",
                path.display(),
                line_no + 1,
                fields.len(),
                features.len() + 1
            );
        }
        let mut fields = fields.into_iter();
        samples.extend(fields.next());
        for field in fields {
            let value: f64 = field
                .parse()
                .with_context(|| format!("{}: invalid number {:?}", path.display(), field))?;
            values.push(value);
        }
    }

    let table = Array2::from_shape_vec((samples.len(), features.len()), values)?;
    Ok((samples, features, table))
}

/// Returns the group of every sample, in the order of `samples`.
fn read_grouping(path: &Path, samples: &[String]) -> Result<Vec<String>> {
    let groups: HashMap<String, String> = data_lines(path)?
        .into_iter()
        .filter_map(|fields| {
            let mut fields = fields.into_iter();
            Some((fields.next()?, fields.next()?))
        })
        .collect();

    samples
        .iter()
        .map(|sample| {
            groups
                .get(sample)
                .cloned()
                .ok_or_else(|| anyhow!("sample {sample:?} has no group in {}", path.display()))
        })
        .collect()
}
