//! Generate extension files from a specification.
//!
//! The output directory is read as the existing extension: files that are
//! already there and support merging (YAML files, info files) are merged with
//! the generated content, other existing files are skipped unless `--force`
//! is given or `overwrite_existing` is set in the configuration.
//!
//! # Examples
//!
//! ```bash
//! # Generate into ./<root_name>
//! extgen generate my_module.yml
//!
//! # Generate into a specific directory
//! extgen generate my_module.yml --output web/modules/custom/my_module
//!
//! # Show the files without writing them
//! extgen generate my_module.yml --dry-run
//!
//! # Legacy info files
//! extgen generate my_module.yml --core-version 7
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::common::{CliConfig, read_spec};
use crate::assembler::{DirectoryExtension, GeneratedFile, GeneratedFiles};
use crate::config::GeneratorConfig;
use crate::core::{ComponentData, get_str};
use crate::generator::Generator;
use crate::utils::{machine_name, safe_write};

/// Arguments of `extgen generate`.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Specification file (YAML, or JSON with a .json extension)
    spec: PathBuf,

    /// Extension directory to generate into [default: <output_dir>/<root_name>]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the files instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing files that cannot be merged
    #[arg(short, long)]
    force: bool,

    /// Target core version (overrides the configuration)
    #[arg(long, value_name = "N")]
    core_version: Option<u32>,
}

/// What happens to one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// The file is new.
    Create,
    /// The file existed and was merged with the generated content.
    Merge,
    /// The file existed and is replaced.
    Overwrite,
    /// The file existed, cannot be merged and is left alone.
    Skip,
}

impl FileAction {
    fn for_file(file: &GeneratedFile, overwrite: bool) -> Self {
        match (file.exists, file.merged) {
            (false, _) => Self::Create,
            (true, true) => Self::Merge,
            (true, false) if overwrite => Self::Overwrite,
            (true, false) => Self::Skip,
        }
    }

    fn label(self) -> colored::ColoredString {
        match self {
            Self::Create => "create".green(),
            Self::Merge => "merge".cyan(),
            Self::Overwrite => "overwrite".yellow(),
            Self::Skip => "skip".bright_black(),
        }
    }

    fn writes(self) -> bool {
        !matches!(self, Self::Skip)
    }
}

/// Decide what to do with each generated file.
pub fn plan_writes(files: &GeneratedFiles, overwrite: bool) -> Vec<(&str, FileAction)> {
    files
        .iter()
        .map(|(path, file)| (path.as_str(), FileAction::for_file(file, overwrite)))
        .collect()
}

impl GenerateCommand {
    /// Run the command.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = cli.generator_config(self.core_version).await?;
        let spec = read_spec(&self.spec).await?;
        let output = self.output_dir(&config, &spec);
        tracing::info!("Generating {} into {}", self.spec.display(), output.display());

        let extension = DirectoryExtension::open(&output)
            .with_context(|| format!("Failed to read existing files in {}", output.display()))?;
        let generator = Generator::from_config(&config);
        let files = generator.generate(spec, &extension)?;

        let plan = plan_writes(&files, self.force || config.overwrite_existing);
        if self.dry_run {
            print_dry_run(&files, &plan, cli.quiet);
            return Ok(());
        }

        for (path, action) in &plan {
            if !action.writes() {
                tracing::warn!("Skipping existing file {path} (use --force to overwrite)");
                continue;
            }
            let target = output.join(path);
            safe_write(&target, &files[*path].content)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            tracing::debug!("Wrote {}", target.display());
        }

        if !cli.quiet {
            for (path, action) in &plan {
                println!("  {:>9} {}", action.label(), path);
            }
            print_summary(&plan, &output);
        }
        Ok(())
    }

    fn output_dir(&self, config: &GeneratorConfig, spec: &ComponentData) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let name = get_str(spec, "root_name").map(machine_name).unwrap_or_default();
        match &config.output_dir {
            Some(base) => base.join(name),
            None => PathBuf::from(name),
        }
    }
}

fn print_dry_run(files: &GeneratedFiles, plan: &[(&str, FileAction)], quiet: bool) {
    if quiet {
        return;
    }
    for (path, action) in plan {
        println!("{} {} ({})", "==>".bold(), path.bold(), action.label());
        if action.writes() {
            print!("{}", files[*path].content);
        }
        println!();
    }
    println!("{}", "Dry run: no files were written.".yellow());
}

fn print_summary(plan: &[(&str, FileAction)], output: &Path) {
    let count = |wanted: FileAction| plan.iter().filter(|(_, action)| *action == wanted).count();
    println!(
        "\n{} {}",
        "Generated".green().bold(),
        output.display().to_string().bright_white()
    );
    println!("  {} new", count(FileAction::Create));
    println!("  {} merged", count(FileAction::Merge));
    let overwritten = count(FileAction::Overwrite);
    if overwritten > 0 {
        println!("  {overwritten} overwritten");
    }
    println!("  {} skipped", count(FileAction::Skip));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn file(exists: bool, merged: bool) -> GeneratedFile {
        GeneratedFile {
            content: String::new(),
            exists,
            merged,
        }
    }

    #[test]
    fn test_plan_writes() {
        let files = GeneratedFiles::from([
            ("a".to_string(), file(false, false)),
            ("b".to_string(), file(true, true)),
            ("c".to_string(), file(true, false)),
        ]);

        let plan = plan_writes(&files, false);
        assert_eq!(plan, [("a", FileAction::Create), ("b", FileAction::Merge), ("c", FileAction::Skip)]);

        let forced = plan_writes(&files, true);
        assert_eq!(forced[2], ("c", FileAction::Overwrite));
    }

    #[test]
    fn test_output_dir_resolution() {
        let cmd = GenerateCommand {
            spec: PathBuf::from("foo.yml"),
            output: None,
            dry_run: false,
            force: false,
            core_version: None,
        };
        let spec = crate::test_utils::fixtures::data(serde_json::json!({"root_name": "My Module"}));

        assert_eq!(cmd.output_dir(&GeneratorConfig::default(), &spec), PathBuf::from("my_module"));

        let config = GeneratorConfig {
            output_dir: Some(PathBuf::from("modules")),
            ..GeneratorConfig::default()
        };
        assert_eq!(cmd.output_dir(&config, &spec), PathBuf::from("modules/my_module"));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_merges_and_skips() {
        let temp = TempDir::new().unwrap();
        let spec = temp.path().join("foo.yml");
        std::fs::write(&spec, "base: module\nroot_name: foo\nhooks: [cron]\n").unwrap();

        let output = temp.path().join("foo");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(output.join("foo.info.yml"), "name: Foo\nconfigure: foo.settings\n").unwrap();
        std::fs::write(output.join("foo.module"), "<?php\n// hand written\n").unwrap();

        let cli = CliConfig {
            quiet: true,
            config_path: Some(temp.path().join("absent.toml")),
            ..CliConfig::default()
        };
        let cmd = GenerateCommand {
            spec,
            output: Some(output.clone()),
            dry_run: false,
            force: false,
            core_version: None,
        };
        cmd.execute(&cli).await.unwrap();

        let info = std::fs::read_to_string(output.join("foo.info.yml")).unwrap();
        assert!(info.contains("configure: foo.settings"), "{info}");
        assert!(info.contains("type: module"), "{info}");

        let module = std::fs::read_to_string(output.join("foo.module")).unwrap();
        assert_eq!(module, "<?php\n// hand written\n");
    }

    #[tokio::test]
    #[serial]
    async fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let spec = temp.path().join("foo.yml");
        std::fs::write(&spec, "base: module\nroot_name: foo\n").unwrap();

        let cli = CliConfig {
            quiet: true,
            config_path: Some(temp.path().join("absent.toml")),
            ..CliConfig::default()
        };
        let output = temp.path().join("out");
        let cmd = GenerateCommand {
            spec,
            output: Some(output.clone()),
            dry_run: true,
            force: false,
            core_version: Some(7),
        };
        cmd.execute(&cli).await.unwrap();
        assert!(!output.exists());
    }
}
