mod cli;
mod config;

use cli::Args;
use kernel_sbom::prelude::*;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // clap exits with code 2 on invalid arguments
    let args = Args::parse_args();
    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(exit_code_for(&e).as_i32());
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Argument mistakes exit with 2, everything else with 3
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<SbomError>() {
        Some(SbomError::Validation { .. }) | Some(SbomError::InvalidConfiguration { .. }) => {
            ExitCode::InvalidArguments
        }
        _ => ExitCode::ApplicationError,
    }
}

async fn run(mut args: Args) -> Result<()> {
    // Step 1: Layer the config file under the command line
    let config = match &args.config {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(Path::new("."))?,
    };
    if let Some(config) = config {
        args.merge_config(config);
    }

    // Step 2: Build the request
    let request = build_request(&args)?;
    tracing::debug!("Request: {:?}", request);

    // Step 3: Create use case with injected dependencies and execute it
    let use_case = GenerateSbomUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        FileSystemReader::new(),
        StderrProgressReporter::new(),
    );
    let response = use_case.execute(request).await?;

    // Step 4: Persist every output once all of them are rendered
    let output_directory = args
        .output_directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let writer = WriteOutputsUseCase::new(
        SpdxJsonLdFormatter::new(args.prettify_json),
        PlainUsedFilesFormatter::new(),
        FileSystemWriter::new(output_directory),
        StderrProgressReporter::new(),
    );
    let written = writer.execute(&response)?;

    StderrProgressReporter::new().report_completion(&format!(
        "✅ Generated {} file(s) from {} graph nodes",
        written.len(),
        response.stats.nodes
    ));
    Ok(())
}

fn build_request(args: &Args) -> Result<SbomRequest> {
    let src_tree = args
        .src_tree
        .clone()
        .ok_or_else(|| SbomError::InvalidConfiguration {
            message: "No source tree given".to_string(),
            hint: format!(
                "Pass --src-tree or set src_tree in {}",
                config::CONFIG_FILENAME
            ),
        })?;

    let settings = BuildSettings {
        build_type: args
            .build_type
            .clone()
            .unwrap_or_else(|| DEFAULT_BUILD_TYPE.to_string()),
        build_id: args.build_id.clone(),
        package_license: args.package_license.clone(),
        package_version: args.package_version.clone(),
        package_copyright_text: args.package_copyright_text.clone(),
        arch: resolve_arch(args.arch.clone()),
    };

    let mut builder = SbomRequest::builder()
        .src_tree(src_tree)
        .roots(collect_roots(args)?)
        .generate_spdx(args.generate_spdx)
        .generate_used_files(args.generate_used_files)
        .spdx_id_prefix(args.spdx_id_prefix.clone())
        .spdx_id_uuid(args.spdx_id_uuid)
        .created(args.created)
        .settings(settings)
        .exclude_patterns(args.exclude.clone());
    if let Some(obj_tree) = &args.obj_tree {
        builder = builder.obj_tree(obj_tree);
    }

    builder.build()
}

/// Falls back to the variables kbuild itself reads
fn resolve_arch(arch: Option<String>) -> Option<String> {
    arch.or_else(|| std::env::var("SRCARCH").ok())
        .or_else(|| std::env::var("ARCH").ok())
        .filter(|arch| !arch.trim().is_empty())
}

/// Roots given directly, listed in `--roots-file` and derived from `--modules-order`
fn collect_roots(args: &Args) -> Result<Vec<PathBuf>> {
    let mut roots = args.roots.clone();

    if let Some(path) = &args.roots_file {
        let listing = read_listing(path)?;
        roots.extend(
            listing
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from),
        );
    }

    if let Some(path) = &args.modules_order {
        roots.extend(ModuleRoots::from_listing(&read_listing(path)?));
    }

    Ok(roots)
}

fn read_listing(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        SbomError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}
