use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::ConfigFile;

/// Generate SPDX 3.0 SBOMs for Linux kernel builds from kbuild .cmd files
#[derive(Parser, Debug)]
#[command(name = "kernel-sbom")]
#[command(version)]
#[command(
    about = "Generate SPDX 3.0 SBOMs for Linux kernel builds from kbuild .cmd files",
    long_about = None
)]
pub struct Args {
    /// Root of the kernel source tree
    #[arg(long, value_name = "DIR")]
    pub src_tree: Option<PathBuf>,

    /// Root of the output tree (defaults to the source tree)
    #[arg(long, visible_alias = "output-tree", value_name = "DIR")]
    pub obj_tree: Option<PathBuf>,

    /// Root artifacts, relative to the output tree (e.g. vmlinux)
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// File listing one root artifact per line
    #[arg(long, value_name = "FILE")]
    pub roots_file: Option<PathBuf>,

    /// modules.order listing; every module becomes a `.ko` root
    #[arg(long, value_name = "FILE")]
    pub modules_order: Option<PathBuf>,

    /// Generate the source, build and output SPDX documents
    #[arg(long)]
    pub generate_spdx: bool,

    /// Generate the list of source files used by the build
    #[arg(long)]
    pub generate_used_files: bool,

    /// Directory the documents are written to (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// Prefix of the generated SPDX namespaces (default: urn:spdx.dev:)
    #[arg(long, value_name = "PREFIX")]
    pub spdx_id_prefix: Option<String>,

    /// Fixed uuid of the generated SPDX namespaces (random by default)
    #[arg(long, value_name = "UUID")]
    pub spdx_id_uuid: Option<Uuid>,

    /// Fixed creation time, RFC 3339 (now by default)
    #[arg(long, value_name = "TIMESTAMP")]
    pub created: Option<DateTime<Utc>>,

    /// build_buildType of every Build element
    #[arg(long, value_name = "URI")]
    pub build_type: Option<String>,

    /// build_buildId of every Build element
    #[arg(long, value_name = "ID")]
    pub build_id: Option<String>,

    /// Declared license of the output packages (default: from COPYING)
    #[arg(long, value_name = "EXPRESSION")]
    pub package_license: Option<String>,

    /// Version of the output packages
    #[arg(long, value_name = "VERSION")]
    pub package_version: Option<String>,

    /// Copyright text of the output packages (default: content of COPYING)
    #[arg(long, value_name = "TEXT")]
    pub package_copyright_text: Option<String>,

    /// Source architecture (default: $SRCARCH, then $ARCH)
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Pretty-print the JSON-LD documents
    #[arg(long)]
    pub prettify_json: bool,

    /// Exclude files matching patterns from the used-files report (supports wildcards: *)
    /// Can be specified multiple times: -e "scripts/*" -e "*Makefile"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Configuration file (default: ./kernel-sbom.config.yml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Fills every option not given on the command line from the config file
    pub fn merge_config(&mut self, config: ConfigFile) {
        fill(&mut self.src_tree, config.src_tree);
        fill(&mut self.obj_tree, config.obj_tree);
        fill(&mut self.roots_file, config.roots_file);
        fill(&mut self.modules_order, config.modules_order);
        fill(&mut self.output_directory, config.output_directory);
        fill(&mut self.spdx_id_prefix, config.spdx_id_prefix);
        fill(&mut self.build_type, config.build_type);
        fill(&mut self.build_id, config.build_id);
        fill(&mut self.package_license, config.package_license);
        fill(&mut self.package_version, config.package_version);
        fill(&mut self.package_copyright_text, config.package_copyright_text);
        fill(&mut self.arch, config.arch);

        // validated when the config file was loaded
        if self.spdx_id_uuid.is_none() {
            self.spdx_id_uuid = config
                .spdx_id_uuid
                .and_then(|uuid| Uuid::parse_str(&uuid).ok());
        }
        if self.created.is_none() {
            self.created = config
                .created
                .and_then(|created| DateTime::parse_from_rfc3339(&created).ok())
                .map(|created| created.with_timezone(&Utc));
        }

        if self.roots.is_empty() {
            self.roots = config.roots.unwrap_or_default();
        }
        if self.exclude.is_empty() {
            self.exclude = config.used_files_exclude.unwrap_or_default();
        }

        self.generate_spdx |= config.generate_spdx.unwrap_or(false);
        self.generate_used_files |= config.generate_used_files.unwrap_or(false);
        self.prettify_json |= config.prettify_json.unwrap_or(false);
    }
}

fn fill<T>(target: &mut Option<T>, fallback: Option<T>) {
    if target.is_none() {
        *target = fallback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "kernel-sbom",
            "--src-tree",
            "/linux",
            "--output-tree",
            "/linux/build",
            "--roots",
            "vmlinux",
            "arch/x86/boot/bzImage",
            "--generate-spdx",
            "--spdx-id-uuid",
            "123e4567-e89b-12d3-a456-426614174000",
            "--created",
            "2024-01-01T00:00:00Z",
            "-e",
            "scripts/*",
        ])
        .unwrap();

        assert_eq!(args.src_tree, Some(PathBuf::from("/linux")));
        assert_eq!(args.obj_tree, Some(PathBuf::from("/linux/build")));
        assert_eq!(
            args.roots,
            vec![PathBuf::from("vmlinux"), PathBuf::from("arch/x86/boot/bzImage")]
        );
        assert!(args.generate_spdx);
        assert!(!args.generate_used_files);
        assert!(args.spdx_id_uuid.is_some());
        assert_eq!(
            args.created.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(args.exclude, vec!["scripts/*".to_string()]);
    }

    #[test]
    fn test_parse_rejects_invalid_uuid() {
        let result = Args::try_parse_from(["kernel-sbom", "--spdx-id-uuid", "not-a-uuid"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_config_fills_missing_values() {
        let mut args = Args::try_parse_from(["kernel-sbom", "--src-tree", "/cli"]).unwrap();
        let config = ConfigFile {
            src_tree: Some(PathBuf::from("/config")),
            obj_tree: Some(PathBuf::from("/config/build")),
            roots: Some(vec![PathBuf::from("vmlinux")]),
            generate_used_files: Some(true),
            spdx_id_uuid: Some("123e4567-e89b-12d3-a456-426614174000".to_string()),
            used_files_exclude: Some(vec!["*Makefile".to_string()]),
            ..ConfigFile::default()
        };

        args.merge_config(config);

        assert_eq!(args.src_tree, Some(PathBuf::from("/cli")));
        assert_eq!(args.obj_tree, Some(PathBuf::from("/config/build")));
        assert_eq!(args.roots, vec![PathBuf::from("vmlinux")]);
        assert!(args.generate_used_files);
        assert!(!args.generate_spdx);
        assert_eq!(
            args.spdx_id_uuid.map(|u| u.to_string()).as_deref(),
            Some("123e4567-e89b-12d3-a456-426614174000")
        );
        assert_eq!(args.exclude, vec!["*Makefile".to_string()]);
    }

    #[test]
    fn test_merge_config_keeps_cli_lists() {
        let mut args = Args::try_parse_from([
            "kernel-sbom",
            "--roots",
            "bzImage",
            "-e",
            "scripts/*",
        ])
        .unwrap();
        let config = ConfigFile {
            roots: Some(vec![PathBuf::from("vmlinux")]),
            used_files_exclude: Some(vec!["*Makefile".to_string()]),
            ..ConfigFile::default()
        };

        args.merge_config(config);

        assert_eq!(args.roots, vec![PathBuf::from("bzImage")]);
        assert_eq!(args.exclude, vec!["scripts/*".to_string()]);
    }
}
