use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, CommandFactory as _, Parser, Subcommand, error::ErrorKind};

#[derive(Parser, Debug)]
#[command(name = "aigen", version, subcommand_negates_reqs = true)]
struct Cli {
    #[command(flatten)]
    compile: CompileArgs,

    /// Show per-node notes (repeat for trace output).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input AIGEN document. A path spelled like a subcommand needs a `./` prefix.
    #[arg(required = true, value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output blueprint JSON. A path spelled like a subcommand needs a `./` prefix.
    #[arg(required = true, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Effects manifest (defaults to `effects_manifest.json` beside the executable).
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Fail when the effects manifest is missing or unreadable.
    #[arg(long)]
    strict_manifest: bool,

    /// Re-encode image assets as RGBA PNG.
    #[arg(long)]
    fix_images: bool,

    /// Directory for re-encoded images (defaults to `changed/` beside the output).
    #[arg(long, requires = "fix_images")]
    fixed_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a blueprint JSON back into AIGEN text.
    Decompile(DecompileArgs),
    /// Show how an effect type maps onto engine property indices.
    Manifest(ManifestArgs),
}

#[derive(Parser, Debug)]
struct DecompileArgs {
    /// Input blueprint JSON.
    blueprint: PathBuf,

    /// Output AIGEN path (defaults to the input with an `.aigen` extension).
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ManifestArgs {
    /// User-facing effect type, e.g. "Gaussian Blur".
    effect: String,

    /// Effects manifest (defaults to `effects_manifest.json` beside the executable).
    #[arg(long)]
    manifest: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.cmd {
        Some(Command::Decompile(args)) => cmd_decompile(args),
        Some(Command::Manifest(args)) => cmd_manifest(args),
        None => cmd_compile(cli.compile),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let (Some(input), Some(output)) = (args.input, args.output) else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "expected <INPUT> <OUTPUT> or a subcommand",
            )
            .exit();
    };

    let image_fix = if args.fix_images {
        let out_dir = args.fixed_dir.unwrap_or_else(|| {
            output
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("changed")
        });
        aigen::ImageFixMode::RgbaPng { out_dir }
    } else {
        aigen::ImageFixMode::Disabled
    };

    let opts = aigen::CompileOpts {
        manifest_path: args.manifest,
        strict_manifest: args.strict_manifest,
        assets_root: None,
        image_fix,
    };

    aigen::compile_file(&input, &output, &opts)
        .with_context(|| format!("compile '{}'", input.display()))?;

    eprintln!("wrote {}", output.display());
    Ok(())
}

fn cmd_decompile(args: DecompileArgs) -> anyhow::Result<()> {
    let written = aigen::decompile_file(&args.blueprint, args.output.as_deref())
        .with_context(|| format!("decompile '{}'", args.blueprint.display()))?;
    eprintln!("wrote {}", written.display());
    Ok(())
}

fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let path = args
        .manifest
        .unwrap_or_else(aigen::default_manifest_path);
    let mut diags = aigen::Diagnostics::new();
    let manifest = aigen::EffectManifest::load(&path, &mut diags)?;

    let entry = manifest.get(&args.effect).with_context(|| {
        format!(
            "effect '{}' not found in '{}' ({} known types)",
            args.effect,
            path.display(),
            manifest.len()
        )
    })?;

    println!("{} -> {}", args.effect, entry.match_name);
    let mut current = None;
    for (group, prop) in entry.property_names() {
        if current != Some(group) {
            println!("  [{}]", group.unwrap_or("-"));
            current = Some(group);
        }
        println!("    {} = {}", prop.name, prop.index);
    }
    Ok(())
}
